use super::{EngineError, EngineExit, EngineHandle, MediaEngine};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, warn};

/// Runs the ffmpeg binary as a child process, reading its stderr.
#[derive(Clone, Debug)]
pub struct FfmpegEngine {
    binary: String,
}

impl FfmpegEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn start(&self, args: Vec<String>) -> Result<Box<dyn EngineHandle>, EngineError> {
        debug!("Running: {} {}", self.binary, args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(EngineError::Spawn)?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Spawn(std::io::Error::other("stderr not captured")))?;

        Ok(Box::new(FfmpegHandle {
            child,
            lines: Some(BufReader::new(stderr).lines()),
        }))
    }
}

struct FfmpegHandle {
    child: Child,
    lines: Option<Lines<BufReader<ChildStderr>>>,
}

#[async_trait]
impl EngineHandle for FfmpegHandle {
    async fn next_line(&mut self) -> Option<String> {
        let lines = self.lines.as_mut()?;
        match lines.next_line().await {
            Ok(Some(line)) => Some(line),
            Ok(None) => {
                self.lines = None;
                None
            }
            Err(e) => {
                warn!("Error reading engine output: {}", e);
                self.lines = None;
                None
            }
        }
    }

    async fn wait(&mut self) -> Result<EngineExit, EngineError> {
        let status = self.child.wait().await?;
        Ok(EngineExit {
            code: status.code(),
        })
    }

    async fn kill(&mut self) {
        // Child::kill also reaps the process.
        if let Err(e) = self.child.kill().await {
            warn!("Failed to kill engine process: {}", e);
        }
    }
}
