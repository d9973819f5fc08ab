use crate::common::transient::TransientFile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

pub const OUTPUT_CONTENT_TYPE: &str = "video/mp4";
pub const OUTPUT_EXTENSION: &str = "mp4";

pub const DEFAULT_TRIM_START: Duration = Duration::ZERO;
pub const DEFAULT_TRIM_DURATION: Duration = Duration::from_secs(10);

/// Retrieval URLs stay valid for one hour.
pub const URL_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Compress,
    Convert,
    Trim,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Compress => "compress",
            Action::Convert => "convert",
            Action::Trim => "trim",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "compress" => Some(Action::Compress),
            "convert" => Some(Action::Convert),
            "trim" => Some(Action::Trim),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated transform. Only `Trim` carries parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformSpec {
    Compress,
    Convert,
    Trim { start: Duration, duration: Duration },
}

impl TransformSpec {
    pub fn action(&self) -> Action {
        match self {
            TransformSpec::Compress => Action::Compress,
            TransformSpec::Convert => Action::Convert,
            TransformSpec::Trim { .. } => Action::Trim,
        }
    }
}

/// The submitted video, spooled to a transient file.
#[derive(Debug)]
pub struct UploadedAsset {
    pub id: Uuid,
    pub original_name: String,
    pub content_type: String,
    pub size: u64,
    pub file: TransientFile,
}

impl UploadedAsset {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[derive(Debug)]
pub struct ProcessedAsset {
    pub id: Uuid,
    pub content_type: &'static str,
    pub file: TransientFile,
}

impl ProcessedAsset {
    pub fn storage_key(&self) -> String {
        format!("processed/{}.{}", self.id, OUTPUT_EXTENSION)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Received,
    Validating,
    Transforming,
    Uploading,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutput {
    pub url: String,
    pub expires_at: OffsetDateTime,
}
