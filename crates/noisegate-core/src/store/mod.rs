//! Persistence seams used by the session controller.
//!
//! [`PlanStore`] keeps the one in-progress plan of a user so that a restart
//! resumes mid-mission. [`ArchiveStore`] keeps completed plans. Both have
//! SQLite implementations; tests substitute their own.

use async_trait::async_trait;
use log::warn;
use tokio::{
    runtime::{Handle, RuntimeFlavor},
    task,
};

use crate::{
    db::Database,
    error::{GateError, Result},
    models::{HistoryEntry, Plan},
};

mod archive;

pub use archive::SqliteArchive;

/// Number of entries returned by a history fetch.
pub const HISTORY_LIMIT: usize = 50;

/// Runs synchronous store work from inside the async runtime.
///
/// On a multi-threaded runtime the current worker hands its other tasks
/// over before blocking, so ticks and requests elsewhere keep flowing.
/// Without a runtime, or on a current-thread one, the work runs inline.
pub(crate) fn run_blocking<R>(work: impl FnOnce() -> R) -> R {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            task::block_in_place(work)
        }
        _ => work(),
    }
}

/// Storage for the in-progress plan of each user.
pub trait PlanStore: Send {
    /// Loads the stored plan. A stored document that does not decode is
    /// reported as absent.
    fn load(&self, user_id: &str) -> Result<Option<Plan>>;

    /// Replaces the stored plan.
    fn save(&self, user_id: &str, plan: &Plan) -> Result<()>;

    /// Removes the stored plan.
    fn clear(&self, user_id: &str) -> Result<()>;
}

impl PlanStore for Database {
    fn load(&self, user_id: &str) -> Result<Option<Plan>> {
        match self.load_active_plan(user_id) {
            Err(GateError::CorruptDocument { user_id, source }) => {
                warn!("Ignoring unreadable stored plan for user {user_id}: {source}");
                Ok(None)
            }
            other => other,
        }
    }

    fn save(&self, user_id: &str, plan: &Plan) -> Result<()> {
        self.save_active_plan(user_id, plan)
    }

    fn clear(&self, user_id: &str) -> Result<()> {
        self.clear_active_plan(user_id)
    }
}

/// Append-only archive of completed plans.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Stores a snapshot of `plan` in the user's history.
    async fn append(&self, user_id: &str, plan: &Plan) -> Result<()>;

    /// The user's most recent entries, newest plan first.
    async fn list_recent(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>>;
}
