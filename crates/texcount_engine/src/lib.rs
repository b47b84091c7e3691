//! Texcount engine: invocation building, process execution and timers.
mod count;
mod engine;
mod invocation;
mod parse;
mod runner;
mod types;

pub use count::run_texcount;
pub use engine::{EngineEvents, EngineHandle};
pub use invocation::{
    anchor_wrapper_dir, build_invocation, ensure_executable, wrapper_script, HostPlatform,
    Invocation, MERGE_FLAG,
};
pub use parse::parse_texcount_output;
pub use runner::{CountRunner, ProcessOutput, TokioProcessRunner};
pub use types::{
    CommandSettings, CountError, CountJob, EngineConfig, EngineEvent, RequestId, TexCountReport,
    TimerToken,
};
