use std::path::PathBuf;
use std::sync::Once;

use pretty_assertions::assert_eq;
use texcount_core::{
    update, CountFailure, CountReport, CounterConfig, CounterState, Effect, Msg, RequestId,
    COUNT_FAILED_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(texcount_logging::initialize_for_tests);
}

fn auto_run_state() -> CounterState {
    let config = CounterConfig::from_settings("onSave", 1000, Vec::new(), "texcount", false);
    let (state, _) = update(
        CounterState::new(),
        Msg::ConfigurationChanged {
            config,
            active_file: None,
        },
    );
    state
}

fn save(state: CounterState, file: &str) -> (CounterState, RequestId) {
    let (state, effects) = update(state, Msg::DocumentSaved(PathBuf::from(file)));
    let id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::RunCount(request) => Some(request.request_id),
            _ => None,
        })
        .expect("run effect");
    (state, id)
}

fn manual(state: CounterState, file: &str, merge: bool) -> (CounterState, RequestId) {
    let (state, effects) = update(
        state,
        Msg::CountRequested {
            file: PathBuf::from(file),
            merge,
        },
    );
    match effects.as_slice() {
        [Effect::RunCount(request)] => (state, request.request_id),
        other => panic!("unexpected effects {other:?}"),
    }
}

fn finished(
    state: CounterState,
    request_id: RequestId,
    result: Result<CountReport, CountFailure>,
) -> (CounterState, Vec<Effect>) {
    update(state, Msg::CountFinished { request_id, result })
}

fn report(words: &str, floats: Option<u64>) -> CountReport {
    CountReport {
        words: words.to_string(),
        floats,
    }
}

#[test]
fn initial_status_is_empty() {
    init_logging();
    let view = auto_run_state().view();
    assert!(view.status.visible);
    assert_eq!(view.status.text, "");
    assert_eq!(view.status.tooltip, "");
    assert_eq!(view.word_count, "");
}

#[test]
fn save_result_updates_summary_and_status() {
    init_logging();
    let (state, id) = save(auto_run_state(), "main.tex");
    let (mut state, effects) = finished(state, id, Ok(report("42", Some(0))));

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.word_count, "42");
    assert_eq!(view.message, "There are 42 words in the LaTeX project.");
    assert_eq!(view.status.text, "42 words");
    assert_eq!(view.status.tooltip, "There are 42 words in the LaTeX project.");
    assert_eq!(view.in_flight, 0);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn manual_result_is_notified_without_touching_status_text() {
    init_logging();
    let (state, id) = manual(auto_run_state(), "main.tex", false);
    let (state, effects) = finished(state, id, Ok(report("100", Some(3))));

    let expected =
        "There are 100 words and 3 floats (tables, figures, etc.) in the opened LaTeX file.";
    assert_eq!(effects, vec![Effect::ShowInformation(expected.to_string())]);
    let view = state.view();
    assert_eq!(view.word_count, "100");
    assert_eq!(view.message, expected);
    assert_eq!(view.status.text, "");
}

#[test]
fn failure_shows_error_and_keeps_previous_result() {
    init_logging();
    let (state, id) = manual(auto_run_state(), "main.tex", true);
    let (state, _) = finished(state, id, Ok(report("17", None)));

    for failure in [
        CountFailure::ExitStatus(Some(1)),
        CountFailure::Launch,
        CountFailure::Unparseable,
        CountFailure::TimedOut,
    ] {
        let (next, id) = manual(state.clone(), "main.tex", true);
        let (next, effects) = finished(next, id, Err(failure));
        assert_eq!(
            effects,
            vec![Effect::ShowError(COUNT_FAILED_MESSAGE.to_string())]
        );
        assert_eq!(next.view().word_count, "17");
        assert_eq!(next.view().message, "There are 17 words in the LaTeX project.");
        assert_eq!(next.view().in_flight, 0);
    }
}

#[test]
fn stale_result_does_not_overwrite_newer_one() {
    init_logging();
    let (state, older) = save(auto_run_state(), "main.tex");
    let (state, newer) = manual(state, "main.tex", true);

    let (state, effects) = finished(state, newer, Ok(report("20", None)));
    assert_eq!(
        effects,
        vec![Effect::ShowInformation(
            "There are 20 words in the LaTeX project.".to_string()
        )]
    );

    let (state, effects) = finished(state, older, Ok(report("10", None)));
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.word_count, "20");
    assert_eq!(view.status.text, "20 words");
}

#[test]
fn stale_manual_result_is_still_notified() {
    init_logging();
    let (state, older) = manual(auto_run_state(), "main.tex", false);
    let (state, newer) = save(state, "main.tex");

    let (state, _) = finished(state, newer, Ok(report("30", None)));
    let (state, effects) = finished(state, older, Ok(report("5", None)));

    assert_eq!(
        effects,
        vec![Effect::ShowInformation(
            "There are 5 words in the opened LaTeX file.".to_string()
        )]
    );
    assert_eq!(state.view().word_count, "30");
}

#[test]
fn unknown_request_is_ignored() {
    init_logging();
    let state = auto_run_state();
    let before = state.view();
    let (state, effects) = finished(state, 99, Ok(report("1", None)));
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
}

#[test]
fn empty_word_count_clears_status() {
    init_logging();
    let (state, id) = save(auto_run_state(), "main.tex");
    let (state, _) = finished(state, id, Ok(report("12", None)));
    assert_eq!(state.view().status.text, "12 words");

    let (state, _) = update(state, Msg::SuppressionElapsed);
    let (state, id) = save(state, "main.tex");
    let (state, _) = finished(state, id, Ok(report("", None)));

    let view = state.view();
    assert_eq!(view.status.text, "");
    assert_eq!(view.status.tooltip, "");
}

#[test]
fn reload_refreshes_status_from_stored_summary() {
    init_logging();
    let (state, id) = manual(auto_run_state(), "main.tex", true);
    let (state, _) = finished(state, id, Ok(report("8", None)));
    assert_eq!(state.view().status.text, "");

    let config = CounterConfig::from_settings("onSave", 1000, Vec::new(), "texcount", false);
    let (state, _) = update(
        state,
        Msg::ConfigurationChanged {
            config,
            active_file: None,
        },
    );
    assert_eq!(state.view().status.text, "8 words");
}
