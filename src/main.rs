use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod game;
mod io;
mod ui;
pub use config::{Cli, Config};
pub use game::{Game, GameEvent};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        if let Err(err) = init_logging(path) {
            eprintln!("cursed-panels: {err:#}");
            return ExitCode::from(1);
        }
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "invalid configuration");
            eprintln!("cursed-panels: {err}");
            return ExitCode::from(2);
        }
    };

    match app::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(err = %format!("{err:#}"), "terminal failure");
            eprintln!("cursed-panels: {err:#}");
            ExitCode::from(1)
        }
    }
}

// The game owns the terminal, so logs only ever go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
