use super::command::FfmpegCommand;
use super::progress::{Observed, ProgressTracker};
use super::{EngineError, MediaEngine};
use crate::common::timecode::to_seconds_arg;
use crate::modules::processing::model::TransformSpec;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const COMPRESS_VIDEO_BITRATE: &str = "1000k";
const COMPRESS_CRF: u8 = 28;
const VIDEO_CODEC: &str = "libx264";
const AUDIO_CODEC: &str = "aac";
const DIAGNOSTIC_TAIL: usize = 20;

#[derive(Clone)]
pub struct TransformAdapter {
    engine: Arc<dyn MediaEngine>,
}

impl TransformAdapter {
    pub fn new(engine: Arc<dyn MediaEngine>) -> Self {
        Self { engine }
    }

    pub fn command(input: &Path, output: &Path, spec: &TransformSpec) -> FfmpegCommand {
        let cmd = FfmpegCommand::new(input, output);
        let cmd = match spec {
            TransformSpec::Compress => cmd
                .video_codec(VIDEO_CODEC)
                .video_bitrate(COMPRESS_VIDEO_BITRATE)
                .crf(COMPRESS_CRF)
                .audio_codec(AUDIO_CODEC),
            TransformSpec::Convert => cmd.video_codec(VIDEO_CODEC).audio_codec(AUDIO_CODEC),
            TransformSpec::Trim { start, duration } => cmd
                .seek(to_seconds_arg(*start))
                .duration(to_seconds_arg(*duration))
                .video_codec(VIDEO_CODEC)
                .audio_codec(AUDIO_CODEC),
        };
        cmd.faststart()
    }

    /// Run one transform of `input` into `output`.
    ///
    /// `on_progress` sees each new percentage in non-decreasing order. The
    /// engine process has been reaped by the time this returns, whatever the
    /// outcome. Does not retry.
    pub async fn run(
        &self,
        input: &Path,
        output: &Path,
        spec: &TransformSpec,
        on_progress: &(dyn Fn(u8) + Send + Sync),
        cancel: &CancellationToken,
    ) -> Result<(), EngineError> {
        let args = Self::command(input, output, spec).build_args();
        let mut tracker = match spec {
            TransformSpec::Trim { start, duration } => {
                ProgressTracker::with_window(*start, *duration)
            }
            _ => ProgressTracker::new(),
        };
        let mut diagnostics: VecDeque<String> = VecDeque::with_capacity(DIAGNOSTIC_TAIL);

        let mut handle = self.engine.start(args).await?;
        info!(action = %spec.action(), "Media engine started");

        loop {
            let line = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                line = handle.next_line() => Some(line),
            };

            match line {
                None => {
                    handle.kill().await;
                    info!("Media engine killed on cancellation");
                    return Err(EngineError::Cancelled);
                }
                Some(None) => break,
                Some(Some(line)) => match tracker.observe(&line) {
                    Observed::Percentage(pct) => {
                        debug!(pct, "Transform progress");
                        on_progress(pct);
                    }
                    Observed::Status => {}
                    Observed::Diagnostic => {
                        if diagnostics.len() == DIAGNOSTIC_TAIL {
                            diagnostics.pop_front();
                        }
                        diagnostics.push_back(line);
                    }
                },
            }
        }

        let exit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            exit = handle.wait() => Some(exit),
        };
        let exit = match exit {
            Some(exit) => exit?,
            None => {
                handle.kill().await;
                return Err(EngineError::Cancelled);
            }
        };

        if !exit.success() {
            let diagnostic = Vec::from(diagnostics).join("\n");
            error!(code = ?exit.code, "Media engine failed:\n{}", diagnostic);
            return Err(EngineError::Failed {
                code: exit.code,
                diagnostic,
            });
        }

        if !tokio::fs::try_exists(output).await? {
            return Err(EngineError::MissingOutput(output.to_path_buf()));
        }

        Ok(())
    }
}
