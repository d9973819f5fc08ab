use crate::common::transient::TransientFile;
use crate::modules::processing::error::JobError;
use crate::modules::processing::executor::{size_limit_message, validate_content_type};
use crate::modules::processing::model::UploadedAsset;
use anyhow::Context;
use axum::extract::multipart::Field;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{error, info};
use uuid::Uuid;

/// Stream a multipart field into a transient file under `work_dir`.
///
/// The MIME type is checked before anything is written, and streaming stops
/// as soon as `max_bytes` is exceeded. On any error the partial file is removed.
pub async fn spool_to_disk(
    mut field: Field<'_>,
    work_dir: &Path,
    max_bytes: u64,
) -> Result<UploadedAsset, JobError> {
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let original_name = field.file_name().unwrap_or("video").to_string();

    validate_content_type(&content_type)?;

    let id = Uuid::new_v4();
    let file_name = format!("{}-input{}", id, extension_of(&original_name));
    let file = TransientFile::new(work_dir.join(file_name));
    let mut writer = BufWriter::new(
        File::create(file.path())
            .await
            .context("Failed to create upload file")?,
    );

    let mut size: u64 = 0;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(c)) => c,
            Ok(None) => break,
            Err(e) => {
                error!("Upload stream error: {}", e);
                return Err(JobError::Validation("Upload interrupted".to_string()));
            }
        };

        size += chunk.len() as u64;
        if size > max_bytes {
            return Err(JobError::Validation(size_limit_message(max_bytes)));
        }

        writer
            .write_all(&chunk)
            .await
            .context("Failed to write upload file")?;
    }

    writer.flush().await.context("Failed to flush upload file")?;
    info!(%id, file = %original_name, size, "Upload received");

    Ok(UploadedAsset {
        id,
        original_name,
        content_type,
        size,
        file,
    })
}

/// Keep a short alphanumeric extension from the client's file name.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_sanitised() {
        assert_eq!(extension_of("clip.mp4"), ".mp4");
        assert_eq!(extension_of("weird.m p4"), "");
        assert_eq!(extension_of("../../etc/passwd"), "");
        assert_eq!(extension_of("noext"), "");
    }
}
