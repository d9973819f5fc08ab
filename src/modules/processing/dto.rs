use super::resolver::TransformParams;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// `compress` (default), `convert` or `trim`.
    pub action: Option<String>,
    /// Trim start, seconds or `HH:MM:SS`. Defaults to 0.
    pub start: Option<String>,
    /// Trim length, seconds or `HH:MM:SS`. Defaults to 10.
    pub duration: Option<String>,
    /// Progress connection to report to, as sent by `/ws`.
    pub connection_id: Option<Uuid>,
}

impl UploadQuery {
    pub fn params(&self) -> TransformParams {
        TransformParams {
            start: self.start.clone(),
            duration: self.duration.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: OffsetDateTime,
}
