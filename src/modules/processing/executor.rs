use super::error::JobError;
use super::model::{
    JobOutput, JobState, OUTPUT_CONTENT_TYPE, OUTPUT_EXTENSION, ProcessedAsset, TransformSpec,
    URL_TTL, UploadedAsset,
};
use crate::common::transient::TransientFile;
use crate::infrastructure::engine::adapter::TransformAdapter;
use crate::infrastructure::storage::StorageGateway;
use crate::modules::progress::hub::ProgressSink;
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

pub const INVALID_VIDEO_MESSAGE: &str = "Please upload a valid video file";

pub fn size_limit_message(max_bytes: u64) -> String {
    format!("File size exceeds {}MB limit", max_bytes / (1024 * 1024))
}

/// MIME type must be `video/*`.
pub fn validate_content_type(content_type: &str) -> Result<(), JobError> {
    match content_type.parse::<mime::Mime>() {
        Ok(m) if m.type_() == mime::VIDEO => Ok(()),
        _ => Err(JobError::Validation(INVALID_VIDEO_MESSAGE.to_string())),
    }
}

pub fn validate_size(size: u64, max_bytes: u64) -> Result<(), JobError> {
    if size > max_bytes {
        return Err(JobError::Validation(size_limit_message(max_bytes)));
    }
    Ok(())
}

/// An accepted upload and the transform already resolved for it.
pub struct JobRequest {
    pub asset: UploadedAsset,
    pub spec: TransformSpec,
}

/// Outcome of one job plus the states it went through.
#[derive(Debug)]
pub struct JobReport {
    pub job_id: Uuid,
    pub history: Vec<JobState>,
    pub result: Result<JobOutput, JobError>,
}

impl JobReport {
    pub fn final_state(&self) -> Option<JobState> {
        self.history.last().copied()
    }
}

struct Trail {
    history: Vec<JobState>,
}

impl Trail {
    fn enter(&mut self, state: JobState) {
        info!(state = ?state, "Job state changed");
        self.history.push(state);
    }
}

/// Drives a single upload from intake to retrieval URL.
///
/// Holds no per-job state, so one instance serves any number of concurrent
/// jobs. Every transient file a job creates is gone by the time `execute`
/// returns, on every path.
#[derive(Clone)]
pub struct JobExecutor {
    adapter: TransformAdapter,
    storage: Arc<dyn StorageGateway>,
    work_dir: PathBuf,
    max_upload_bytes: u64,
}

impl JobExecutor {
    pub fn new(
        adapter: TransformAdapter,
        storage: Arc<dyn StorageGateway>,
        work_dir: impl Into<PathBuf>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            adapter,
            storage,
            work_dir: work_dir.into(),
            max_upload_bytes,
        }
    }

    pub fn work_dir(&self) -> &std::path::Path {
        &self.work_dir
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    pub async fn execute(
        &self,
        request: JobRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> JobReport {
        let job_id = request.asset.id;
        let span = info_span!("job", %job_id);

        async move {
            let mut trail = Trail { history: Vec::new() };
            trail.enter(JobState::Received);

            let result = self.drive(&mut trail, request, sink, cancel).await;
            match &result {
                Ok(_) => trail.enter(JobState::Completed),
                Err(e) => {
                    match e {
                        JobError::Validation(msg) => warn!("Job rejected: {}", msg),
                        other => error!("Job failed: {}", other),
                    }
                    trail.enter(JobState::Failed);
                }
            }

            JobReport {
                job_id,
                history: trail.history,
                result,
            }
        }
        .instrument(span)
        .await
    }

    async fn drive(
        &self,
        trail: &mut Trail,
        request: JobRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<JobOutput, JobError> {
        let JobRequest { asset, spec } = request;

        trail.enter(JobState::Validating);
        if let Err(e) = self.validate(&asset) {
            asset.file.remove().await;
            return Err(e);
        }
        info!(
            action = %spec.action(),
            file = %asset.original_name,
            size = asset.size,
            "Upload accepted"
        );

        trail.enter(JobState::Transforming);
        let output_id = Uuid::new_v4();
        let output = TransientFile::new(
            self.work_dir
                .join(format!("{}-output.{}", output_id, OUTPUT_EXTENSION)),
        );

        let publish = |pct: u8| sink.publish(pct);
        let transformed = self
            .adapter
            .run(asset.path(), output.path(), &spec, &publish, cancel)
            .await;

        // The input is not needed past this point, whatever the outcome.
        asset.file.remove().await;
        if let Err(e) = transformed {
            output.remove().await;
            return Err(e.into());
        }

        let processed = ProcessedAsset {
            id: output_id,
            content_type: OUTPUT_CONTENT_TYPE,
            file: output,
        };

        trail.enter(JobState::Uploading);
        let key = processed.storage_key();
        let uploaded = self
            .storage
            .put(&key, processed.file.path(), processed.content_type)
            .await;
        processed.file.remove().await;
        uploaded?;

        let url = self.storage.presigned_get(&key, URL_TTL).await?;
        info!(key, backend = self.storage.backend_name(), "Processed video stored");

        Ok(JobOutput {
            url,
            expires_at: OffsetDateTime::now_utc() + URL_TTL,
        })
    }

    fn validate(&self, asset: &UploadedAsset) -> Result<(), JobError> {
        validate_content_type(&asset.content_type)?;
        validate_size(asset.size, self.max_upload_bytes)
    }
}
