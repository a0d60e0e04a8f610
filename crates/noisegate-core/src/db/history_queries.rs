//! Archive of plan snapshots.

use jiff::Timestamp;
use log::warn;
use rusqlite::params;

use crate::{
    error::{DatabaseResultExt, Result},
    models::{HistoryEntry, Plan, HISTORY_KIND},
};

const INSERT_HISTORY_SQL: &str = "INSERT INTO history \
     (user_id, plan_id, kind, document, created_at_ms, saved_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_RECENT_HISTORY_SQL: &str = "SELECT id, user_id, kind, document, saved_at \
     FROM history WHERE user_id = ?1 \
     ORDER BY created_at_ms DESC, id DESC LIMIT ?2";

impl super::Database {
    /// Appends a snapshot of `plan` to the user's history.
    ///
    /// Returns the row id of the new entry.
    pub fn append_history(&mut self, user_id: &str, plan: &Plan) -> Result<i64> {
        let document = serde_json::to_string(plan)?;
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_HISTORY_SQL,
            params![
                user_id,
                plan.id,
                HISTORY_KIND,
                document,
                plan.created_at.as_millisecond(),
                Timestamp::now().to_string(),
            ],
        )
        .db_context("Failed to insert history entry")?;
        let id = tx.last_insert_rowid();

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(id)
    }

    /// Lists the most recent history entries of a user, newest plan first.
    ///
    /// Entries whose stored document no longer decodes are skipped.
    pub fn list_history(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_RECENT_HISTORY_SQL)
            .db_context("Failed to prepare history query")?;

        let rows = stmt
            .query_map(params![user_id, limit as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .db_context("Failed to query history")?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, user_id, kind, document, saved_at) =
                row.db_context("Failed to read history row")?;

            let plan = match serde_json::from_str::<Plan>(&document) {
                Ok(plan) => plan,
                Err(e) => {
                    warn!("Skipping unreadable history entry {id}: {e}");
                    continue;
                }
            };
            let saved_at = saved_at.parse::<Timestamp>().unwrap_or(plan.created_at);

            entries.push(HistoryEntry {
                user_id,
                saved_at,
                kind,
                plan,
            });
        }

        Ok(entries)
    }
}
