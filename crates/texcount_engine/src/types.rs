use std::path::PathBuf;
use std::time::Duration;

pub type RequestId = u64;
pub type TimerToken = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory holding the `texcount` / `texcount.bat` wrapper scripts.
    pub wrapper_dir: PathBuf,
    /// Upper bound for one texcount run; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wrapper_dir: PathBuf::from("scripts"),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSettings {
    pub command_path: String,
    pub args: Vec<String>,
    pub use_docker: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountJob {
    pub request_id: RequestId,
    pub file: PathBuf,
    pub merge: bool,
    pub command: CommandSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexCountReport {
    pub words: String,
    pub floats: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CountCompleted {
        request_id: RequestId,
        result: Result<TexCountReport, CountError>,
    },
    TimerElapsed {
        token: TimerToken,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CountError {
    #[error("target has no file name or directory: {0:?}")]
    InvalidTarget(PathBuf),
    #[error("failed to launch {program:?}: {message}")]
    Launch { program: PathBuf, message: String },
    #[error("texcount exited with status {code:?}: {stderr}")]
    ExitStatus { code: Option<i32>, stderr: String },
    #[error("texcount output contained no word count")]
    MissingWordCount { stdout: String },
    #[error("texcount did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("io error while reading texcount output: {0}")]
    Io(String),
}
