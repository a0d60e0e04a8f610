use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{DoneArgs, EditArgs, LoginArgs, MissionArgs, StartArgs};

/// Break one goal into focused steps and work through them on a timer
///
/// State your goal with `mission`, then run each step's countdown with
/// `start`. Completed missions are kept in `history`. Decomposition uses the
/// Gemini API; set GEMINI_API_KEY before running `mission`.
#[derive(Parser)]
#[command(version, about, name = "ng")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/noisegate/noisegate.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Countdown length for the steps of a new mission, in minutes
    #[arg(long, global = true, value_name = "MINUTES")]
    pub focus_minutes: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without one, `status` is shown.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, creating the local account on first use
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// Show the current screen
    #[command(alias = "s")]
    Status,
    /// Break a goal down into steps and start a mission
    #[command(alias = "m")]
    Mission(MissionArgs),
    /// Start a step's countdown (Ctrl-C pauses it)
    Start(StartArgs),
    /// Resume the paused step's countdown
    #[command(alias = "r")]
    Resume,
    /// Mark a step as done
    #[command(alias = "d")]
    Done(DoneArgs),
    /// Set a step's remaining time
    #[command(alias = "e")]
    Edit(EditArgs),
    /// Abandon the current mission
    Abort,
    /// Leave the success screen and start over
    New,
    /// Show completed missions
    #[command(alias = "h")]
    History,
}
