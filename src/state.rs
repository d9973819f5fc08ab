use crate::config::settings::AppConfig;
use crate::infrastructure::engine::MediaEngine;
use crate::infrastructure::engine::adapter::TransformAdapter;
use crate::infrastructure::storage::StorageGateway;
use crate::modules::processing::executor::JobExecutor;
use crate::modules::progress::hub::ProgressHub;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub executor: JobExecutor,
    pub progress: Arc<ProgressHub>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn StorageGateway>,
        engine: Arc<dyn MediaEngine>,
    ) -> Self {
        let executor = JobExecutor::new(
            TransformAdapter::new(engine),
            storage,
            config.work_dir.clone(),
            config.max_upload_bytes,
        );

        Self {
            config,
            executor,
            progress: Arc::new(ProgressHub::new()),
        }
    }
}
