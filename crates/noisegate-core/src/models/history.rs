//! Archived plan snapshots.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::Plan;

/// Document kind recorded with every archived plan.
pub const HISTORY_KIND: &str = "task_decomposition_v1";

/// Immutable snapshot of a plan in a user's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// Owner of the snapshot
    pub user_id: String,

    /// When the snapshot was archived (UTC)
    pub saved_at: Timestamp,

    /// Document kind tag
    pub kind: String,

    /// The plan as it was when archived
    pub plan: Plan,
}

impl HistoryEntry {
    /// Snapshots `plan` for `user_id` at the current instant.
    pub fn snapshot(user_id: impl Into<String>, plan: &Plan) -> Self {
        Self {
            user_id: user_id.into(),
            saved_at: Timestamp::now(),
            kind: HISTORY_KIND.to_string(),
            plan: plan.clone(),
        }
    }
}
