//! Settings files and scope resolution.
//!
//! Settings live in `.texcount.ron`. For a given scope (a document or a
//! workspace directory) the nearest ancestor file wins; an explicit
//! `--config` path bypasses the search. Anything unreadable falls back to
//! the defaults as a whole.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use texcount_core::{CounterConfig, DEFAULT_COMMAND_PATH, DEFAULT_INTERVAL_MS};
use texcount_logging::{tc_info, tc_warn};

pub const SETTINGS_FILENAME: &str = ".texcount.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct PersistedSettings {
    autorun: String,
    interval: u64,
    args: Vec<String>,
    path: String,
    docker: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            autorun: "never".to_string(),
            interval: DEFAULT_INTERVAL_MS,
            args: vec!["-merge".to_string()],
            path: DEFAULT_COMMAND_PATH.to_string(),
            docker: false,
        }
    }
}

impl From<PersistedSettings> for CounterConfig {
    fn from(settings: PersistedSettings) -> Self {
        CounterConfig::from_settings(
            &settings.autorun,
            settings.interval,
            settings.args,
            settings.path,
            settings.docker,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSettings {
    pub config: CounterConfig,
    /// File the settings came from, if any.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsSource {
    explicit: Option<PathBuf>,
}

impl SettingsSource {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    pub fn locate(&self, scope: Option<&Path>) -> Option<PathBuf> {
        if let Some(explicit) = &self.explicit {
            return Some(explicit.clone());
        }
        let scope = match scope {
            Some(scope) => scope.to_path_buf(),
            None => std::env::current_dir().ok()?,
        };
        find_settings_file(&scope)
    }

    pub fn load(&self, scope: Option<&Path>) -> LoadedSettings {
        match self.locate(scope) {
            Some(path) => LoadedSettings {
                config: load_settings_file(&path),
                path: Some(path),
            },
            None => LoadedSettings {
                config: CounterConfig::default(),
                path: None,
            },
        }
    }
}

/// Nearest `.texcount.ron` in `scope` (or its directory, for files) and its ancestors.
pub fn find_settings_file(scope: &Path) -> Option<PathBuf> {
    let scope = fs::canonicalize(scope).unwrap_or_else(|_| scope.to_path_buf());
    let start = if scope.is_dir() {
        scope.as_path()
    } else {
        scope.parent()?
    };
    start
        .ancestors()
        .map(|dir| dir.join(SETTINGS_FILENAME))
        .find(|candidate| candidate.is_file())
}

pub fn load_settings_file(path: &Path) -> CounterConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tc_info!("No settings at {:?}, using defaults", path);
            return CounterConfig::default();
        }
        Err(err) => {
            tc_warn!("Failed to read settings from {:?}: {}", path, err);
            return CounterConfig::default();
        }
    };

    match ron::from_str::<PersistedSettings>(&content) {
        Ok(settings) => {
            tc_info!("Loaded settings from {:?}", path);
            settings.into()
        }
        Err(err) => {
            tc_warn!("Failed to parse settings from {:?}: {}", path, err);
            CounterConfig::default()
        }
    }
}

/// Writes the default settings into `dir`, replacing an existing file only with `force`.
pub fn write_default_settings(dir: &Path, force: bool) -> Result<PathBuf> {
    let target = dir.join(SETTINGS_FILENAME);
    if target.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", target.display());
    }

    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(&PersistedSettings::default(), pretty)
        .context("serializing default settings")?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.flush()?;
    tmp.persist(&target)
        .map_err(|err| err.error)
        .with_context(|| format!("writing {}", target.display()))?;
    Ok(target)
}
