use crate::config::settings::StorageConfig;
use crate::docs::ApiDoc;
use crate::infrastructure::storage::local::PUBLIC_PREFIX;
use crate::state::AppState;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn configure_routes(state: &AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(crate::modules::health::router())
        .merge(crate::modules::processing::router(state.config.max_upload_bytes))
        .merge(crate::modules::progress::router());

    // Legacy mode: serve processed files straight from disk.
    if let StorageConfig::Local { dir, .. } = &state.config.storage {
        router = router.nest_service(&format!("/{}", PUBLIC_PREFIX), ServeDir::new(dir));
    }

    router.layer(cors)
}
