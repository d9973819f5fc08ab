use crate::config::env::{self, EnvKey};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("WORK_DIR and LOCAL_STORAGE_DIR must differ: {0}")]
    WorkDirConflict(PathBuf),
}

#[derive(Clone, Debug)]
pub enum StorageConfig {
    S3 {
        endpoint: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        region: String,
    },
    /// Legacy mode: processed files land in a directory served by this process.
    Local {
        dir: PathBuf,
        public_base_url: String,
    },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub storage: StorageConfig,
    pub ffmpeg_path: String,
    pub work_dir: PathBuf,
    pub max_upload_bytes: u64,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let server_port = env::get_parsed(EnvKey::ServerPort, 3000);

        let storage = match env::get_opt(EnvKey::LocalStorageDir) {
            Some(dir) => StorageConfig::Local {
                dir: PathBuf::from(dir),
                public_base_url: env::get_or(
                    EnvKey::PublicBaseUrl,
                    &format!("http://localhost:{}", server_port),
                ),
            },
            None => StorageConfig::S3 {
                endpoint: required(EnvKey::StorageEndpoint)?,
                bucket: required(EnvKey::StorageBucket)?,
                access_key: required(EnvKey::StorageAccessKey)?,
                secret_key: required(EnvKey::StorageSecretKey)?,
                region: env::get_or(EnvKey::StorageRegion, "us-east-1"),
            },
        };

        let work_dir = env::get_opt(EnvKey::WorkDir)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("videoshift"));
        check_work_dir(&work_dir, &storage)?;

        Ok(Self {
            server_port,
            storage,
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            work_dir,
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

/// The work dir is swept at startup, so it must not hold stored output.
fn check_work_dir(work_dir: &Path, storage: &StorageConfig) -> Result<(), ConfigError> {
    if let StorageConfig::Local { dir, .. } = storage {
        let resolve = |p: &Path| std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
        if resolve(dir) == resolve(work_dir) {
            return Err(ConfigError::WorkDirConflict(work_dir.to_path_buf()));
        }
    }
    Ok(())
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    let name = key.as_str();
    env::get_opt(key).ok_or(ConfigError::Missing(name))
}
