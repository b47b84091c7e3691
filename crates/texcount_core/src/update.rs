use std::path::{Path, PathBuf};

use texcount_logging::{tc_debug, tc_info, tc_warn};

use crate::state::InFlight;
use crate::{
    summary_message, CountPurpose, CountSummary, CounterState, Effect, Msg, COUNT_FAILED_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: CounterState, msg: Msg) -> (CounterState, Vec<Effect>) {
    let effects = match msg {
        Msg::ConfigurationChanged {
            config,
            active_file,
        } => {
            state.load_configuration(config, active_file);
            update_status_visibility(&mut state)
        }
        Msg::DocumentSaved(file) => count_on_save(&mut state, file),
        Msg::ActiveDocumentSaved { config, file } => {
            state.load_configuration(config, Some(file.clone()));
            if !apply_status_visibility(&mut state) {
                return (state, Vec::new());
            }
            // A suppressed save still counts the newly active document once.
            let effects = count_on_save(&mut state, file);
            if effects.is_empty() {
                count_active_file(&mut state)
            } else {
                effects
            }
        }
        Msg::CountRequested { file, merge } => {
            let request = state.begin_count(file, merge, CountPurpose::Notify);
            vec![Effect::RunCount(request)]
        }
        Msg::SuppressionElapsed => {
            state.set_suppressed(false);
            Vec::new()
        }
        Msg::CountFinished { request_id, result } => {
            let Some(InFlight { purpose, merge }) = state.finish_count(request_id) else {
                tc_warn!("Ignoring result for unknown count request {}", request_id);
                return (state, Vec::new());
            };
            match result {
                Ok(report) => {
                    let message = summary_message(&report, merge);
                    let summary = CountSummary {
                        word_count: report.words,
                        message: message.clone(),
                    };
                    if !state.apply_summary(request_id, summary) {
                        tc_debug!(
                            "Count request {} finished after a newer one; keeping newer result",
                            request_id
                        );
                    }
                    match purpose {
                        CountPurpose::Status => {
                            state.refresh_status();
                            Vec::new()
                        }
                        CountPurpose::Notify => vec![Effect::ShowInformation(message)],
                    }
                }
                Err(failure) => {
                    tc_warn!("Count request {} failed: {}", request_id, failure);
                    vec![Effect::ShowError(COUNT_FAILED_MESSAGE.to_string())]
                }
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn count_on_save(state: &mut CounterState, file: PathBuf) -> Vec<Effect> {
    if !state.config().auto_run {
        return Vec::new();
    }
    if state.is_suppressed() {
        tc_info!(
            "Count after save of {} skipped, previous count started less than {:?} ago",
            file.display(),
            state.config().auto_run_interval
        );
        return Vec::new();
    }
    state.set_suppressed(true);
    let after = state.config().auto_run_interval;
    let request = state.begin_count(file, true, CountPurpose::Status);
    vec![
        Effect::ScheduleSuppressionReset { after },
        Effect::RunCount(request),
    ]
}

fn update_status_visibility(state: &mut CounterState) -> Vec<Effect> {
    if apply_status_visibility(state) {
        count_active_file(state)
    } else {
        Vec::new()
    }
}

/// Shows the refreshed status when auto-run is on and hides it otherwise.
/// Returns whether auto-run is on.
fn apply_status_visibility(state: &mut CounterState) -> bool {
    if !state.config().auto_run {
        state.set_status_visible(false);
        return false;
    }
    state.refresh_status();
    state.set_status_visible(true);
    true
}

fn count_active_file(state: &mut CounterState) -> Vec<Effect> {
    let active_file = state.active_file().map(Path::to_path_buf);
    match active_file {
        Some(file) => {
            let request = state.begin_count(file, true, CountPurpose::Status);
            vec![Effect::RunCount(request)]
        }
        None => Vec::new(),
    }
}
