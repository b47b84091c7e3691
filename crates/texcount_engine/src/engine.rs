use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::count::run_texcount;
use crate::runner::{CountRunner, TokioProcessRunner};
use crate::{CountJob, EngineConfig, EngineEvent, TimerToken};

enum EngineCommand {
    Count(CountJob),
    Timer { token: TimerToken, after: Duration },
}

/// Sending side of the engine. Cloneable; every clone feeds the same runtime.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving side of the engine.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> (Self, EngineEvents) {
        let runner = Arc::new(TokioProcessRunner::new(config.timeout));
        Self::with_runner(config, runner)
    }

    pub fn with_runner(
        config: EngineConfig,
        runner: Arc<dyn CountRunner>,
    ) -> (Self, EngineEvents) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let config = Arc::new(config);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let runner = runner.clone();
                let config = config.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(runner.as_ref(), &config, command, event_tx).await;
                });
            }
        });

        (Self { cmd_tx }, EngineEvents { event_rx })
    }

    pub fn submit(&self, job: CountJob) {
        let _ = self.cmd_tx.send(EngineCommand::Count(job));
    }

    /// Emits `EngineEvent::TimerElapsed { token }` once `after` has passed.
    pub fn schedule_timer(&self, token: TimerToken, after: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::Timer { token, after });
    }
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    runner: &dyn CountRunner,
    config: &EngineConfig,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Count(job) => {
            let result = run_texcount(runner, config, &job).await;
            let _ = event_tx.send(EngineEvent::CountCompleted {
                request_id: job.request_id,
                result,
            });
        }
        EngineCommand::Timer { token, after } => {
            tokio::time::sleep(after).await;
            let _ = event_tx.send(EngineEvent::TimerElapsed { token });
        }
    }
}
