#![forbid(unsafe_code)]

mod app;
mod cli;
mod effects;
mod render;
mod settings;
mod watcher;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run_from_env() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
