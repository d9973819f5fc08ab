//! Transform engine adapter.
//!
//! The external media engine is reached through [`MediaEngine`], a small
//! start/lines/wait capability. [`adapter::TransformAdapter`] builds the
//! invocation for a transform, turns status lines into percentages and makes
//! sure the process is gone before it returns.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

pub mod adapter;
pub mod command;
pub mod ffmpeg;
pub mod progress;

#[cfg(test)]
pub mod scripted;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to start media engine: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Media engine exited with status {code:?}: {diagnostic}")]
    Failed {
        code: Option<i32>,
        diagnostic: String,
    },

    #[error("Media engine run was cancelled")]
    Cancelled,

    #[error("Media engine did not produce {0}")]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the engine process ended. `code` is `None` when killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineExit {
    pub code: Option<i32>,
}

impl EngineExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[async_trait]
pub trait MediaEngine: Send + Sync {
    async fn start(&self, args: Vec<String>) -> Result<Box<dyn EngineHandle>, EngineError>;
}

/// A running engine process.
#[async_trait]
pub trait EngineHandle: Send {
    /// Next status/diagnostic line, `None` once the stream is closed.
    async fn next_line(&mut self) -> Option<String>;

    /// Reap the process.
    async fn wait(&mut self) -> Result<EngineExit, EngineError>;

    /// Terminate and reap the process.
    async fn kill(&mut self);
}
