use std::sync::mpsc;
use std::thread;

use texcount_core::{CountFailure, CountReport, CountRequest, Effect, Msg};
use texcount_engine::{
    CommandSettings, CountError, CountJob, EngineConfig, EngineEvent, EngineEvents, EngineHandle,
    TexCountReport, TimerToken,
};
use texcount_logging::{tc_debug, tc_warn};

use crate::render::Notifier;

const SUPPRESSION_TIMER: TimerToken = 1;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, msg_tx: mpsc::Sender<Msg>) -> Self {
        let (engine, events) = EngineHandle::new(config);
        spawn_event_loop(events, msg_tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: &[Effect], notifier: &mut dyn Notifier) {
        for effect in effects {
            match effect {
                Effect::RunCount(request) => {
                    tc_debug!(
                        "RunCount request_id={} file={:?} merge={} purpose={:?}",
                        request.request_id,
                        request.file,
                        request.merge,
                        request.purpose
                    );
                    self.engine.submit(to_job(request));
                }
                Effect::ScheduleSuppressionReset { after } => {
                    self.engine.schedule_timer(SUPPRESSION_TIMER, *after);
                }
                Effect::ShowInformation(message) => notifier.information(message),
                Effect::ShowError(message) => notifier.error(message),
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CountCompleted { request_id, result } => Msg::CountFinished {
            request_id,
            result: result.map(map_report).map_err(|err| map_failure(&err)),
        },
        EngineEvent::TimerElapsed { token: SUPPRESSION_TIMER } => Msg::SuppressionElapsed,
        EngineEvent::TimerElapsed { token } => {
            tc_warn!("Unknown timer token {}", token);
            Msg::NoOp
        }
    }
}

pub(crate) fn to_job(request: &CountRequest) -> CountJob {
    CountJob {
        request_id: request.request_id,
        file: request.file.clone(),
        merge: request.merge,
        command: CommandSettings {
            command_path: request.command_path.clone(),
            args: request.command_args.clone(),
            use_docker: request.use_docker,
        },
    }
}

fn map_report(report: TexCountReport) -> CountReport {
    CountReport {
        words: report.words,
        floats: report.floats,
    }
}

fn map_failure(err: &CountError) -> CountFailure {
    match err {
        CountError::InvalidTarget(_) | CountError::Launch { .. } | CountError::Io(_) => {
            CountFailure::Launch
        }
        CountError::ExitStatus { code, .. } => CountFailure::ExitStatus(*code),
        CountError::MissingWordCount { .. } => CountFailure::Unparseable,
        CountError::TimedOut(_) => CountFailure::TimedOut,
    }
}
