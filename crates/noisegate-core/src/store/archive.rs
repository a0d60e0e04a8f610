//! SQLite-backed archive of completed plans.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::task;

use super::ArchiveStore;
use crate::{
    db::Database,
    error::{GateError, Result},
    models::{HistoryEntry, Plan},
};

/// Archive writing to the `history` table of a database file.
///
/// Each call opens its own connection on the blocking pool, so appends
/// spawned in the background never contend with the session's connection.
#[derive(Debug, Clone)]
pub struct SqliteArchive {
    db_path: PathBuf,
}

impl SqliteArchive {
    /// Creates an archive over the database at `db_path`.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

#[async_trait]
impl ArchiveStore for SqliteArchive {
    async fn append(&self, user_id: &str, plan: &Plan) -> Result<()> {
        let db_path = self.db_path.clone();
        let user_id = user_id.to_string();
        let plan = plan.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.append_history(&user_id, &plan).map(|_| ())
        })
        .await
        .map_err(GateError::join)?
    }

    async fn list_recent(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let db_path = self.db_path.clone();
        let user_id = user_id.to_string();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_history(&user_id, limit)
        })
        .await
        .map_err(GateError::join)?
    }
}
