use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use texcount_engine::EngineConfig;
use texcount_logging::LogDestination;

use crate::app::{run_count, run_init, run_watch};

#[derive(Debug, Parser)]
#[command(
    name = "texcount_app",
    about = "Word counts for LaTeX documents via texcount, with count-on-save",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Settings file to use instead of the nearest `.texcount.ron`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory containing the Docker wrapper scripts.
    #[arg(long = "scripts-dir", global = true, default_value = "scripts")]
    pub scripts_dir: PathBuf,

    /// Kill texcount runs that take longer than this.
    #[arg(long = "timeout-ms", global = true)]
    pub timeout_ms: Option<u64>,

    /// Where log output goes: file, terminal or both.
    #[arg(long, global = true, default_value = "file", value_parser = parse_log_destination)]
    pub log: LogDestination,

    /// Log file path for the file destination.
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            wrapper_dir: self.scripts_dir.clone(),
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Count words once and print the summary.
    Count(CountArgs),

    /// Keep a status line up to date, recounting when files are saved.
    Watch(WatchArgs),

    /// Write a default `.texcount.ron` settings file.
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct CountArgs {
    /// LaTeX file to count.
    pub file: PathBuf,

    /// Count only the given file instead of the merged project.
    #[arg(long = "no-merge")]
    pub no_merge: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Files to watch; the first one starts out as the active document.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// How often file modification times are checked.
    #[arg(long = "poll-ms", default_value_t = 250)]
    pub poll_ms: u64,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to write the settings file into.
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing settings file.
    #[arg(long)]
    pub force: bool,
}

fn parse_log_destination(raw: &str) -> Result<LogDestination, String> {
    LogDestination::parse(raw).ok_or_else(|| format!("unknown log destination `{raw}`"))
}

pub fn run_from_env() -> Result<ExitCode> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    texcount_logging::initialize(cli.global.log, cli.global.log_file.as_deref());
    match cli.command {
        Commands::Count(args) => run_count(&cli.global, args),
        Commands::Watch(args) => run_watch(&cli.global, args),
        Commands::Init(args) => run_init(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_defaults_to_merge() {
        let cli = Cli::try_parse_from(["texcount_app", "count", "main.tex"]).unwrap();
        match cli.command {
            Commands::Count(args) => {
                assert_eq!(args.file, PathBuf::from("main.tex"));
                assert!(!args.no_merge);
                assert!(!args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.global.log, LogDestination::File);
        assert_eq!(cli.global.engine_config(), EngineConfig::default());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "texcount_app",
            "watch",
            "a.tex",
            "b.tex",
            "--timeout-ms",
            "500",
            "--log",
            "both",
        ])
        .unwrap();
        assert_eq!(cli.global.timeout_ms, Some(500));
        assert_eq!(cli.global.log, LogDestination::Both);
        match cli.command {
            Commands::Watch(args) => assert_eq!(args.files.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_log_destination_is_rejected() {
        let parsed = Cli::try_parse_from(["texcount_app", "--log", "syslog", "count", "a.tex"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn watch_requires_a_file() {
        assert!(Cli::try_parse_from(["texcount_app", "watch"]).is_err());
    }
}
