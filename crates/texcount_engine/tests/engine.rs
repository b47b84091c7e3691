use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use texcount_engine::{
    CommandSettings, CountError, CountJob, CountRunner, EngineConfig, EngineEvent, EngineHandle,
    Invocation, ProcessOutput,
};

struct FixedRunner;

#[async_trait::async_trait]
impl CountRunner for FixedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, CountError> {
        Ok(ProcessOutput {
            success: true,
            code: Some(0),
            stdout: format!("File: {}\nWords in text: 9\n", invocation.args.join(" ")),
            stderr: String::new(),
        })
    }
}

fn job(request_id: u64) -> CountJob {
    CountJob {
        request_id,
        file: PathBuf::from("/doc/main.tex"),
        merge: true,
        command: CommandSettings {
            command_path: "texcount".to_string(),
            args: Vec::new(),
            use_docker: false,
        },
    }
}

#[test]
fn submitted_job_reports_completion() {
    texcount_logging::initialize_for_tests();
    let (engine, events) =
        EngineHandle::with_runner(EngineConfig::default(), Arc::new(FixedRunner));

    engine.submit(job(11));

    match events.recv_timeout(Duration::from_secs(5)) {
        Some(EngineEvent::CountCompleted { request_id, result }) => {
            assert_eq!(request_id, 11);
            assert_eq!(result.unwrap().words, "9");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn timer_fires_after_delay() {
    texcount_logging::initialize_for_tests();
    let (engine, events) =
        EngineHandle::with_runner(EngineConfig::default(), Arc::new(FixedRunner));
    let started = Instant::now();

    engine.schedule_timer(3, Duration::from_millis(50));

    assert!(events.try_recv().is_none());
    assert_eq!(
        events.recv_timeout(Duration::from_secs(5)),
        Some(EngineEvent::TimerElapsed { token: 3 })
    );
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[test]
fn cloned_handles_share_event_stream() {
    texcount_logging::initialize_for_tests();
    let (engine, events) =
        EngineHandle::with_runner(EngineConfig::default(), Arc::new(FixedRunner));
    let other = engine.clone();

    engine.submit(job(1));
    other.submit(job(2));

    let mut ids = Vec::new();
    for _ in 0..2 {
        if let Some(EngineEvent::CountCompleted { request_id, .. }) =
            events.recv_timeout(Duration::from_secs(5))
        {
            ids.push(request_id);
        }
    }
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
}
