//! Scripted engine used by tests in place of a real ffmpeg.

use super::{EngineError, EngineExit, EngineHandle, MediaEngine};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct ScriptedEngine {
    lines: Vec<String>,
    exit_code: i32,
    write_output: bool,
    hang: bool,
    pub starts: Arc<AtomicUsize>,
    pub killed: Arc<AtomicBool>,
    pub last_args: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEngine {
    /// Emits `lines`, writes the output file and exits 0.
    pub fn succeeding(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            exit_code: 0,
            write_output: true,
            hang: false,
            starts: Arc::default(),
            killed: Arc::default(),
            last_args: Arc::default(),
        }
    }

    /// Emits `lines`, leaves a partial output file behind and exits with `code`.
    pub fn failing(lines: &[&str], code: i32) -> Self {
        Self {
            exit_code: code,
            ..Self::succeeding(lines)
        }
    }

    /// Emits `lines` then blocks until killed.
    pub fn hanging(lines: &[&str]) -> Self {
        Self {
            hang: true,
            ..Self::succeeding(lines)
        }
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn args(&self) -> Vec<String> {
        self.last_args.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaEngine for ScriptedEngine {
    async fn start(&self, args: Vec<String>) -> Result<Box<dyn EngineHandle>, EngineError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.last_args.lock().unwrap() = args.clone();

        // The output path is the last argument, as with ffmpeg.
        let output = args.last().cloned().unwrap_or_default();
        if self.write_output {
            tokio::fs::write(&output, b"processed-video").await?;
        }

        Ok(Box::new(ScriptedHandle {
            lines: self.lines.iter().cloned().collect(),
            exit_code: self.exit_code,
            hang: self.hang,
            killed: self.killed.clone(),
        }))
    }
}

struct ScriptedHandle {
    lines: VecDeque<String>,
    exit_code: i32,
    hang: bool,
    killed: Arc<AtomicBool>,
}

#[async_trait]
impl EngineHandle for ScriptedHandle {
    async fn next_line(&mut self) -> Option<String> {
        tokio::task::yield_now().await;
        match self.lines.pop_front() {
            Some(line) => Some(line),
            None if self.hang => std::future::pending().await,
            None => None,
        }
    }

    async fn wait(&mut self) -> Result<EngineExit, EngineError> {
        Ok(EngineExit {
            code: Some(self.exit_code),
        })
    }

    async fn kill(&mut self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}
