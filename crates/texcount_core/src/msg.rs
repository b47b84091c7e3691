use std::fmt;
use std::path::PathBuf;

use crate::{CountReport, CounterConfig, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Settings for the current scope were (re)loaded, or the active document changed.
    ConfigurationChanged {
        config: CounterConfig,
        active_file: Option<PathBuf>,
    },
    /// A document was written to disk.
    DocumentSaved(PathBuf),
    /// A document other than the active one was saved. It becomes the active
    /// document under `config`, and exactly one count is started for it.
    ActiveDocumentSaved { config: CounterConfig, file: PathBuf },
    /// User asked for a count explicitly.
    CountRequested { file: PathBuf, merge: bool },
    /// The debounce window opened by a save-triggered count has passed.
    SuppressionElapsed,
    /// A count started by `Effect::RunCount` settled.
    CountFinished {
        request_id: RequestId,
        result: Result<CountReport, CountFailure>,
    },
    /// An engine event with nothing to apply, such as an unknown timer.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountFailure {
    Launch,
    ExitStatus(Option<i32>),
    Unparseable,
    TimedOut,
}

impl fmt::Display for CountFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountFailure::Launch => write!(f, "could not launch texcount"),
            CountFailure::ExitStatus(Some(code)) => write!(f, "texcount exited with code {code}"),
            CountFailure::ExitStatus(None) => write!(f, "texcount was terminated by a signal"),
            CountFailure::Unparseable => write!(f, "texcount output had no word count"),
            CountFailure::TimedOut => write!(f, "texcount timed out"),
        }
    }
}
