use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::view_model::{CounterViewModel, StatusView};
use crate::{CountPurpose, CountRequest, CounterConfig};

pub type RequestId = u64;

/// Last successful result. Word count and message are only ever replaced together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountSummary {
    pub word_count: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) purpose: CountPurpose,
    pub(crate) merge: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CounterState {
    config: CounterConfig,
    active_file: Option<PathBuf>,
    suppress_after_save: bool,
    summary: CountSummary,
    status: StatusView,
    in_flight: BTreeMap<RequestId, InFlight>,
    next_request: RequestId,
    last_applied: Option<RequestId>,
    dirty: bool,
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> CounterViewModel {
        CounterViewModel {
            status: self.status.clone(),
            word_count: self.summary.word_count.clone(),
            message: self.summary.message.clone(),
            auto_run: self.config.auto_run,
            suppressed: self.suppress_after_save,
            in_flight: self.in_flight.len(),
            dirty: self.dirty,
        }
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn summary(&self) -> &CountSummary {
        &self.summary
    }

    pub fn active_file(&self) -> Option<&Path> {
        self.active_file.as_deref()
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn load_configuration(
        &mut self,
        config: CounterConfig,
        active_file: Option<PathBuf>,
    ) {
        self.config = config;
        self.active_file = active_file;
        self.dirty = true;
    }

    pub(crate) fn is_suppressed(&self) -> bool {
        self.suppress_after_save
    }

    pub(crate) fn set_suppressed(&mut self, suppressed: bool) {
        self.suppress_after_save = suppressed;
    }

    /// Allocates a request id and records the run as in flight.
    pub(crate) fn begin_count(
        &mut self,
        file: PathBuf,
        merge: bool,
        purpose: CountPurpose,
    ) -> CountRequest {
        self.next_request += 1;
        let request_id = self.next_request;
        self.in_flight.insert(request_id, InFlight { purpose, merge });
        CountRequest {
            request_id,
            file,
            merge,
            purpose,
            command_path: self.config.command_path.clone(),
            command_args: self.config.command_args.clone(),
            use_docker: self.config.use_docker,
        }
    }

    pub(crate) fn finish_count(&mut self, request_id: RequestId) -> Option<InFlight> {
        self.in_flight.remove(&request_id)
    }

    /// Stores `summary` unless a newer request already stored its result.
    pub(crate) fn apply_summary(&mut self, request_id: RequestId, summary: CountSummary) -> bool {
        if self.last_applied.is_some_and(|applied| applied > request_id) {
            return false;
        }
        self.last_applied = Some(request_id);
        self.summary = summary;
        self.dirty = true;
        true
    }

    pub(crate) fn refresh_status(&mut self) {
        let (text, tooltip) = if self.summary.word_count.is_empty() {
            (String::new(), String::new())
        } else {
            (
                format!("{} words", self.summary.word_count),
                self.summary.message.clone(),
            )
        };
        if self.status.text != text || self.status.tooltip != tooltip {
            self.status.text = text;
            self.status.tooltip = tooltip;
            self.dirty = true;
        }
    }

    pub(crate) fn set_status_visible(&mut self, visible: bool) {
        if self.status.visible != visible {
            self.status.visible = visible;
            self.dirty = true;
        }
    }
}
