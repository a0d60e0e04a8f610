//! Noise Gate CLI Application
//!
//! Command-line front end for the Noise Gate focus tool.

mod args;
mod cli;
mod notifier;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use noisegate_core::Config;
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        focus_minutes,
        command,
    } = Args::parse();

    let mut config = Config::from_env();
    if database_file.is_some() {
        config.database_path = database_file;
    }
    if let Some(minutes) = focus_minutes {
        config
            .set_focus_minutes(minutes)
            .context("Invalid --focus-minutes")?;
    }

    let renderer = TerminalRenderer::new(!no_color);

    info!("Noise Gate started");

    Cli::new(config, renderer)
        .run(command.unwrap_or(Commands::Status))
        .await
}
