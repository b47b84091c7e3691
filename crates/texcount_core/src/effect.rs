use std::path::PathBuf;
use std::time::Duration;

use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunCount(CountRequest),
    ScheduleSuppressionReset { after: Duration },
    ShowInformation(String),
    ShowError(String),
}

/// Everything the engine needs to run one texcount invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRequest {
    pub request_id: RequestId,
    pub file: PathBuf,
    pub merge: bool,
    pub purpose: CountPurpose,
    pub command_path: String,
    pub command_args: Vec<String>,
    pub use_docker: bool,
}

/// What happens with a successful result besides storing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountPurpose {
    /// Refresh the status indicator.
    Status,
    /// Show the full message as a one-shot notification.
    Notify,
}
