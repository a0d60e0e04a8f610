//! Core library for Noise Gate, a one-goal focus tool.
//!
//! A user states one goal; a language model breaks it into a few concrete
//! steps; the user works through them one at a time against a countdown.
//! Finished plans go to a history archive.
//!
//! # Layout
//!
//! - [`time_codec`]: seconds to `MM:SS` / `HH:MM:SS` text and back
//! - [`models`]: plans, steps, users and history entries
//! - [`timer`]: the countdown state machine and its tick source
//! - [`session`]: screens and the glue between timer, storage and services
//! - [`store`], [`db`]: SQLite persistence of plans, history and accounts
//! - [`decompose`]: the goal decomposition service
//! - [`identity`]: local sign-in
//! - [`display`]: markdown formatting for terminals
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use noisegate_core::{Config, SessionBuilder, SessionController, User};
//! use tokio::sync::Mutex;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let user = User {
//!     id: "local".to_string(),
//!     email: "me@example.com".to_string(),
//!     name: None,
//! };
//! let session = SessionBuilder::new()
//!     .with_config(Config::from_env())
//!     .with_database_path(Some("noisegate.db"))
//!     .build(user)
//!     .await?;
//!
//! let session = Mutex::new(session);
//! let outcome = SessionController::submit_goal(&session, "Write the launch post").await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod decompose;
pub mod display;
pub mod error;
pub mod identity;
pub mod models;
pub mod session;
pub mod store;
pub mod time_codec;
pub mod timer;

// Re-export commonly used types
pub use config::{Config, GeminiConfig};
pub use db::Database;
pub use decompose::{Decomposer, GeminiDecomposer};
pub use display::{History, LocalDateTime, OperationStatus, ScreenView};
pub use error::{GateError, Result};
pub use identity::{IdentityProvider, LocalIdentity};
pub use models::{Decomposition, HistoryEntry, Plan, SignIn, Step, StepStatus, User};
pub use session::{
    DecompositionOutcome, Screen, SessionBuilder, SessionController,
    DECOMPOSITION_FAILED_MESSAGE,
};
pub use store::{ArchiveStore, PlanStore, SqliteArchive, HISTORY_LIMIT};
pub use timer::{Outcome, TickScheduler, TimerEngine, TimerEvent, TimerState};
