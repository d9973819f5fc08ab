use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Prepare the work directory and delete job files a previous run left in it.
///
/// Only names a job creates are touched: `{uuid}-input[.ext]` and
/// `{uuid}-output.mp4`. Anything else in the directory is left alone.
/// Returns the number of files removed.
pub async fn sweep_work_dir(dir: &Path) -> std::io::Result<usize> {
    tokio::fs::create_dir_all(dir).await?;

    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if !name.to_str().is_some_and(is_job_file) {
            continue;
        }
        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %entry.path().display(), "Failed to remove stale file: {}", e),
        }
    }

    if removed > 0 {
        info!(removed, dir = %dir.display(), "🧹 Removed stale transient files");
    }
    Ok(removed)
}

fn is_job_file(name: &str) -> bool {
    let (Some(prefix), Some(rest)) = (name.get(..36), name.get(36..)) else {
        return false;
    };
    if Uuid::try_parse(prefix).is_err() {
        return false;
    }

    if rest == "-output.mp4" {
        return true;
    }
    match rest.strip_prefix("-input") {
        Some("") => true,
        Some(ext) => ext.strip_prefix('.').is_some_and(|e| {
            !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric())
        }),
        None => false,
    }
}
