//! Texcount core: pure word-count state machine and status view helpers.
mod config;
mod effect;
mod msg;
mod state;
mod summary;
mod update;
mod view_model;

pub use config::{CounterConfig, AUTORUN_ON_SAVE, DEFAULT_COMMAND_PATH, DEFAULT_INTERVAL_MS};
pub use effect::{CountPurpose, CountRequest, Effect};
pub use msg::{CountFailure, Msg};
pub use state::{CountSummary, CounterState, RequestId};
pub use summary::{summary_message, CountReport, COUNT_FAILED_MESSAGE};
pub use update::update;
pub use view_model::{CounterViewModel, StatusView};
