//! Data models for plans, steps, users and history.
//!
//! A [`Plan`] owns its [`Step`]s in a flat, ordered `Vec`. Which step holds
//! the countdown is recorded on the steps themselves (`is_active`) so a
//! persisted plan is self-describing; the timer engine keeps the matching
//! index while the plan is loaded.
//!
//! Display implementations for these models live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use noisegate_core::models::{Decomposition, Plan};
//!
//! let plan = Plan::from_decomposition(
//!     Decomposition {
//!         one_thing: "Publish the release notes".to_string(),
//!         steps: vec!["Collect merged changes".to_string(), "Write the draft".to_string()],
//!         call_to_action: "Move now.".to_string(),
//!     },
//!     1500,
//! );
//!
//! assert_eq!(plan.steps.len(), 2);
//! assert_eq!(plan.progress_percent(), 0);
//! assert_eq!(plan.elapsed_time(), "0m");
//! ```

pub mod decomposition;
pub mod history;
pub mod plan;
pub mod status;
pub mod step;
pub mod user;


pub use decomposition::Decomposition;
pub use history::{HistoryEntry, HISTORY_KIND};
pub use plan::Plan;
pub use status::StepStatus;
pub use step::Step;
pub use user::{SignIn, User};
