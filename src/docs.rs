use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::handler::health,
        crate::modules::processing::handler::upload_video,
        crate::modules::progress::handler::progress_socket,
    ),
    components(
        schemas(
            crate::modules::health::handler::HealthResponse,
            crate::modules::processing::dto::UploadResponse,
            crate::modules::processing::model::Action,
            crate::common::response::ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Processing", description = "Video upload and transformation"),
        (name = "Progress", description = "Real-time job progress")
    )
)]
pub struct ApiDoc;
