use super::dto::{UploadQuery, UploadResponse};
use super::error::JobError;
use super::executor::JobRequest;
use super::resolver::resolve;
use crate::common::response::{ApiError, ApiSuccess, ErrorResponse};
use crate::common::upload::spool_to_disk;
use crate::modules::progress::hub::{ConnectionSink, ServerEvent};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Upload a video and run one transform on it.
///
/// The processed file is stored and a retrieval URL valid for one hour is
/// returned. Progress goes to the WebSocket named by `connection_id`.
#[utoipa::path(
    post,
    path = "/upload",
    params(UploadQuery),
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Field `video`"
    ),
    responses(
        (status = 200, description = "Video processed", body = UploadResponse),
        (status = 400, description = "Invalid upload or parameters", body = ErrorResponse),
        (status = 500, description = "Processing or storage failed", body = ErrorResponse)
    ),
    tag = "Processing"
)]
pub async fn upload_video(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Response {
    let sink = state.progress.sink(query.connection_id).await;

    // Reject bad actions before any bytes hit the disk.
    let spec = match resolve(query.action.as_deref(), &query.params()) {
        Ok(spec) => spec,
        Err(e) => return fail(&sink, e),
    };

    let executor = state.executor.clone();
    let mut asset = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return fail_with(&sink, e.body_text(), e.status()),
        };

        if field.name() == Some("video") {
            match spool_to_disk(field, executor.work_dir(), executor.max_upload_bytes()).await {
                Ok(a) => asset = Some(a),
                Err(e) => return fail(&sink, e),
            }
            break;
        }
    }

    let Some(asset) = asset else {
        return fail(&sink, JobError::Validation("No video file uploaded".to_string()));
    };

    // The job runs on its own task. If the client goes away this future is
    // dropped, the guard cancels the token and the task kills the engine and
    // cleans up.
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let job_sink = sink.clone();
    let job = tokio::spawn(async move {
        executor
            .execute(JobRequest { asset, spec }, &job_sink, &cancel)
            .await
    });
    let report = match job.await {
        Ok(report) => report,
        Err(e) => {
            error!("Job task aborted: {}", e);
            return fail(&sink, JobError::Internal(anyhow::anyhow!("job task aborted: {e}")));
        }
    };

    info!(job_id = %report.job_id, state = ?report.final_state(), "Job finished");
    match report.result {
        Ok(output) => {
            sink.notify(ServerEvent::Complete {
                url: output.url.clone(),
            });
            ApiSuccess(
                UploadResponse {
                    success: true,
                    url: output.url,
                    expires_at: output.expires_at,
                },
                StatusCode::OK,
            )
            .into_response()
        }
        Err(e) => fail(&sink, e),
    }
}

/// Tell the progress client the job is over, then answer the request.
fn fail(sink: &ConnectionSink, error: JobError) -> Response {
    fail_with(sink, error.client_message(), error.status())
}

fn fail_with(sink: &ConnectionSink, message: String, status: StatusCode) -> Response {
    sink.notify(ServerEvent::Failed {
        error: message.clone(),
    });
    ApiError(message, status).into_response()
}
