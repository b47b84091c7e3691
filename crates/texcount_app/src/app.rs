use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use texcount_core::{update, CountReport, CounterConfig, CounterState, Effect, Msg};
use texcount_engine::EngineConfig;
use texcount_logging::{tc_debug, tc_info};

use crate::cli::{CountArgs, GlobalArgs, InitArgs, WatchArgs};
use crate::effects::EffectRunner;
use crate::render::{CapturingNotifier, Notifier, TerminalNotifier};
use crate::settings::{write_default_settings, SettingsSource, SETTINGS_FILENAME};
use crate::watcher::MtimeWatcher;

/// Owns the counter state and routes messages through `update`.
struct App<N: Notifier> {
    state: CounterState,
    runner: EffectRunner,
    notifier: N,
    msg_rx: mpsc::Receiver<Msg>,
}

impl<N: Notifier> App<N> {
    fn new(config: EngineConfig, notifier: N) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            state: CounterState::new(),
            runner: EffectRunner::new(config, msg_tx),
            notifier,
            msg_rx,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let status = state.view().status;
        self.state = state;

        self.runner.enqueue(&effects, &mut self.notifier);
        if was_dirty {
            self.notifier.status(&status);
        }
        effects
    }

    fn configure(&mut self, config: CounterConfig, active_file: Option<PathBuf>) {
        self.dispatch(Msg::ConfigurationChanged {
            config,
            active_file,
        });
    }

    fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.msg_rx.recv_timeout(timeout).ok()
    }

    /// Starts a manual count and pumps messages until that request settles.
    fn count_once(&mut self, file: PathBuf, merge: bool) -> Result<Option<CountReport>> {
        let effects = self.dispatch(Msg::CountRequested { file, merge });
        let request_id = effects
            .iter()
            .find_map(|effect| match effect {
                Effect::RunCount(request) => Some(request.request_id),
                _ => None,
            })
            .ok_or_else(|| anyhow!("count request was not started"))?;

        loop {
            let msg = self
                .msg_rx
                .recv()
                .context("engine stopped before the count finished")?;
            let settled = match &msg {
                Msg::CountFinished {
                    request_id: finished,
                    result,
                } if *finished == request_id => Some(result.clone().ok()),
                _ => None,
            };
            self.dispatch(msg);
            if let Some(report) = settled {
                return Ok(report);
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct CountJson<'a> {
    word_count: &'a str,
    floats: Option<u64>,
    message: &'a str,
    merge: bool,
}

pub fn run_count(global: &GlobalArgs, args: CountArgs) -> Result<ExitCode> {
    let file = absolute(&args.file)?;
    let merge = !args.no_merge;
    let settings = SettingsSource::new(global.config.clone()).load(Some(&file));
    // Counting once needs the settings but not the status indicator.
    let config = CounterConfig {
        auto_run: false,
        ..settings.config
    };

    if !args.json {
        let mut app = App::new(global.engine_config(), TerminalNotifier::stdio(false));
        app.configure(config, None);
        let report = app.count_once(file, merge)?;
        return Ok(exit_code(report.is_some()));
    }

    let mut app = App::new(global.engine_config(), CapturingNotifier::default());
    app.configure(config, None);
    let Some(report) = app.count_once(file, merge)? else {
        for error in &app.notifier.errors {
            eprintln!("{error}");
        }
        return Ok(ExitCode::FAILURE);
    };
    let message = app
        .notifier
        .information
        .last()
        .map(String::as_str)
        .unwrap_or_default();
    let document = CountJson {
        word_count: &report.words,
        floats: report.floats,
        message,
        merge,
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(ExitCode::SUCCESS)
}

pub fn run_watch(global: &GlobalArgs, args: WatchArgs) -> Result<ExitCode> {
    let files = args
        .files
        .iter()
        .map(|file| absolute(file))
        .collect::<Result<Vec<_>>>()?;
    let Some(first) = files.first() else {
        return Ok(ExitCode::SUCCESS);
    };
    let poll = Duration::from_millis(args.poll_ms.max(10));
    let source = SettingsSource::new(global.config.clone());

    let mut app = App::new(global.engine_config(), TerminalNotifier::stdio(true));
    let mut active = first.clone();
    reload(&mut app, &source, &active);

    let mut documents = MtimeWatcher::new(files.iter().cloned());
    let mut settings = MtimeWatcher::new(settings_watch_targets(&source, &active));
    tc_info!("Watching {} file(s), active document {:?}", files.len(), active);

    loop {
        if let Some(msg) = app.next_msg(poll) {
            app.dispatch(msg);
            continue;
        }

        if !settings.poll().is_empty() {
            tc_info!("Settings for {:?} changed, reloading", active);
            reload(&mut app, &source, &active);
        }

        for saved in documents.poll() {
            tc_debug!("Saved {:?}", saved);
            if saved == active {
                app.dispatch(Msg::DocumentSaved(saved));
                continue;
            }
            tc_info!("Active document is now {:?}", saved);
            active = saved.clone();
            switch_on_save(&mut app, &source, saved);
            settings.retarget(settings_watch_targets(&source, &active));
        }
    }
}

pub fn run_init(args: InitArgs) -> Result<ExitCode> {
    let path = write_default_settings(&args.dir, args.force)?;
    println!("Wrote {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn reload<N: Notifier>(app: &mut App<N>, source: &SettingsSource, active: &Path) {
    let loaded = source.load(Some(active));
    tc_debug!("Settings for {:?} come from {:?}", active, loaded.path);
    app.configure(loaded.config, Some(active.to_path_buf()));
}

/// Makes `saved` the active document, loading its settings, and counts it once.
fn switch_on_save<N: Notifier>(
    app: &mut App<N>,
    source: &SettingsSource,
    saved: PathBuf,
) -> Vec<Effect> {
    let loaded = source.load(Some(&saved));
    tc_debug!("Settings for {:?} come from {:?}", saved, loaded.path);
    app.dispatch(Msg::ActiveDocumentSaved {
        config: loaded.config,
        file: saved,
    })
}

/// The located settings file plus the spot next to the active document
/// where a new one would take effect.
fn settings_watch_targets(source: &SettingsSource, active: &Path) -> Vec<PathBuf> {
    let mut targets: Vec<PathBuf> = source.locate(Some(active)).into_iter().collect();
    if let Some(local) = active.parent().map(|dir| dir.join(SETTINGS_FILENAME)) {
        if !targets.contains(&local) {
            targets.push(local);
        }
    }
    targets
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("reading current directory")?
            .join(path)
    };
    Ok(fs::canonicalize(&joined).unwrap_or(joined))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn watch_targets_include_local_settings_spot() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("main.tex");
        fs::write(&doc, "").unwrap();
        let explicit = temp.path().join("team.ron");

        let targets = settings_watch_targets(&SettingsSource::new(Some(explicit.clone())), &doc);

        assert_eq!(targets, vec![explicit, temp.path().join(SETTINGS_FILENAME)]);
    }

    #[test]
    fn save_of_other_document_starts_one_count() {
        texcount_logging::initialize_for_tests();
        let temp = TempDir::new().unwrap();
        let tool = temp.path().join("missing-tool");
        fs::write(
            temp.path().join(SETTINGS_FILENAME),
            format!("(autorun: \"onSave\", path: {:?})", tool.to_string_lossy()),
        )
        .unwrap();
        let first = temp.path().join("a.tex");
        let second = temp.path().join("b.tex");
        let source = SettingsSource::new(None);

        let mut app = App::new(EngineConfig::default(), CapturingNotifier::default());
        reload(&mut app, &source, &first);
        let effects = switch_on_save(&mut app, &source, second.clone());

        let runs: Vec<_> = effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::RunCount(request) => Some(request.file.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(runs, vec![second.clone()]);
        assert_eq!(app.state.active_file(), Some(second.as_path()));
        assert!(app.state.view().suppressed);
    }

    #[cfg(unix)]
    #[test]
    fn count_once_settles_with_fake_tool() {
        use std::os::unix::fs::PermissionsExt;

        texcount_logging::initialize_for_tests();
        let temp = TempDir::new().unwrap();
        let tool = temp.path().join("fake-texcount");
        fs::write(&tool, "#!/bin/sh\necho 'Words in text: 21'\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let mut app = App::new(EngineConfig::default(), CapturingNotifier::default());
        let config = CounterConfig::from_settings(
            "never",
            1000,
            Vec::new(),
            tool.to_string_lossy(),
            false,
        );
        app.configure(config, None);

        let report = app
            .count_once(temp.path().join("main.tex"), false)
            .unwrap()
            .unwrap();

        assert_eq!(report.words, "21");
        assert_eq!(
            app.notifier.information,
            vec!["There are 21 words in the opened LaTeX file.".to_string()]
        );
        assert_eq!(app.state.summary().word_count, "21");
    }

    #[test]
    fn count_once_reports_failure() {
        texcount_logging::initialize_for_tests();
        let temp = TempDir::new().unwrap();
        let mut app = App::new(EngineConfig::default(), CapturingNotifier::default());
        let config = CounterConfig::from_settings(
            "never",
            1000,
            Vec::new(),
            temp.path().join("missing-tool").to_string_lossy(),
            false,
        );
        app.configure(config, None);

        let report = app.count_once(temp.path().join("main.tex"), true).unwrap();

        assert!(report.is_none());
        assert_eq!(
            app.notifier.errors,
            vec![texcount_core::COUNT_FAILED_MESSAGE.to_string()]
        );
    }
}
