use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

mod cli;
use cli::SpegelMirror;
use cli::SettingsArgs;

mod commands;
use commands::Commands;

/// Starts the cli,
///
pub fn start() -> ExitCode {
    use clap::Parser;

    let cli = SpegelMirror::parse();
    tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(if !cli.debug {
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy()
        } else {
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy()
                .add_directive("spegel_mirror=debug".parse().expect("should parse"))
        })
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.handle() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
