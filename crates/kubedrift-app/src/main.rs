mod app;
mod cli;
mod console;

use std::io;

use anyhow::anyhow;
use clap::Parser;
use kubedrift_config::AppConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, UseArgs};
use crate::console::TerminalConsole;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    let level_name = cli.log_level.clone().unwrap_or_else(|| config.general.log_level.clone());
    let level: LevelFilter = level_name.parse().map_err(|_| anyhow!("invalid log level '{level_name}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().with_default_directive(level.into()).from_env_lossy())
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let command = cli.command.unwrap_or_else(|| Command::Use(UseArgs::default()));
    app::run(command, &config, TerminalConsole::new(level)).await
}
