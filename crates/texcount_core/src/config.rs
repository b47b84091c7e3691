use std::time::Duration;

/// The only auto-run mode that enables counting after save.
pub const AUTORUN_ON_SAVE: &str = "onSave";
pub const DEFAULT_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_COMMAND_PATH: &str = "texcount";

/// Word-counter settings, always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterConfig {
    pub auto_run: bool,
    pub auto_run_interval: Duration,
    pub command_args: Vec<String>,
    pub command_path: String,
    pub use_docker: bool,
}

impl CounterConfig {
    /// Builds a config from raw settings values. Nothing is validated.
    pub fn from_settings(
        autorun_mode: &str,
        interval_ms: u64,
        command_args: Vec<String>,
        command_path: impl Into<String>,
        use_docker: bool,
    ) -> Self {
        Self {
            auto_run: autorun_mode == AUTORUN_ON_SAVE,
            auto_run_interval: Duration::from_millis(interval_ms),
            command_args,
            command_path: command_path.into(),
            use_docker,
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            auto_run: false,
            auto_run_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            command_args: vec!["-merge".to_string()],
            command_path: DEFAULT_COMMAND_PATH.to_string(),
            use_docker: false,
        }
    }
}
