use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    StorageEndpoint,
    StorageBucket,
    StorageAccessKey,
    StorageSecretKey,
    StorageRegion,
    LocalStorageDir,
    PublicBaseUrl,
    FfmpegPath,
    WorkDir,
    MaxUploadBytes,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::StorageEndpoint => "MINIO_ENDPOINT",
            EnvKey::StorageBucket => "MINIO_BUCKET",
            EnvKey::StorageAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::StorageSecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::StorageRegion => "STORAGE_REGION",
            EnvKey::LocalStorageDir => "LOCAL_STORAGE_DIR",
            EnvKey::PublicBaseUrl => "PUBLIC_BASE_URL",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::WorkDir => "WORK_DIR",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
