//! Storage of each user's in-progress plan.
//!
//! The plan is kept as one JSON document per user. Saving replaces the
//! whole document, so readers never see a mix of old and new fields.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};
use serde::de::Error as _;

use crate::{
    error::{DatabaseResultExt, GateError, Result},
    models::Plan,
};

const SELECT_ACTIVE_PLAN_SQL: &str = "SELECT document FROM active_plans WHERE user_id = ?1";
const UPSERT_ACTIVE_PLAN_SQL: &str = "INSERT INTO active_plans (user_id, document, updated_at) \
     VALUES (?1, ?2, ?3) \
     ON CONFLICT(user_id) DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at";
const DELETE_ACTIVE_PLAN_SQL: &str = "DELETE FROM active_plans WHERE user_id = ?1";

impl super::Database {
    /// Loads the stored plan of a user.
    ///
    /// # Errors
    ///
    /// Returns `GateError::CorruptDocument` when the stored document is not
    /// a valid plan (including a plan without steps), and
    /// `GateError::Database` when the query fails.
    pub fn load_active_plan(&self, user_id: &str) -> Result<Option<Plan>> {
        let document: Option<String> = self
            .connection
            .query_row(SELECT_ACTIVE_PLAN_SQL, params![user_id], |row| row.get(0))
            .optional()
            .db_context("Failed to query active plan")?;

        let Some(document) = document else {
            return Ok(None);
        };

        let plan: Plan =
            serde_json::from_str(&document).map_err(|source| GateError::CorruptDocument {
                user_id: user_id.to_string(),
                source,
            })?;

        if plan.steps.is_empty() {
            return Err(GateError::CorruptDocument {
                user_id: user_id.to_string(),
                source: serde_json::Error::custom("plan has no steps"),
            });
        }

        Ok(Some(plan))
    }

    /// Replaces the stored plan of a user.
    pub fn save_active_plan(&self, user_id: &str, plan: &Plan) -> Result<()> {
        let document = serde_json::to_string(plan)?;
        self.connection
            .execute(
                UPSERT_ACTIVE_PLAN_SQL,
                params![user_id, document, Timestamp::now().to_string()],
            )
            .db_context("Failed to save active plan")?;
        Ok(())
    }

    /// Removes the stored plan of a user. Removing nothing is not an error.
    pub fn clear_active_plan(&self, user_id: &str) -> Result<()> {
        self.connection
            .execute(DELETE_ACTIVE_PLAN_SQL, params![user_id])
            .db_context("Failed to clear active plan")?;
        Ok(())
    }
}
