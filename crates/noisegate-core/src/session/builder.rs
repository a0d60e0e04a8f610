//! Builder for creating and configuring session controllers.

use std::{path::Path, sync::Arc};

use tokio::task;

use super::SessionController;
use crate::{
    config::Config,
    db::{ensure_parent_dir, Database},
    decompose::{Decomposer, GeminiDecomposer},
    error::{GateError, Result},
    models::User,
    store::{ArchiveStore, SqliteArchive},
};

/// Builder for creating and configuring [`SessionController`] instances.
///
/// Collaborators left unset get their default implementation: the plan
/// store and archive use the configured database file, and decomposition
/// goes to Gemini.
#[derive(Default)]
pub struct SessionBuilder {
    config: Config,
    decomposer: Option<Arc<dyn Decomposer>>,
    archive: Option<Arc<dyn ArchiveStore>>,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/noisegate/noisegate.db` or
    /// `~/.local/share/noisegate/noisegate.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.config.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses a custom decomposition service.
    pub fn with_decomposer(mut self, decomposer: Arc<dyn Decomposer>) -> Self {
        self.decomposer = Some(decomposer);
        self
    }

    /// Uses a custom archive.
    pub fn with_archive(mut self, archive: Arc<dyn ArchiveStore>) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Opens the database and builds a session for `user`.
    ///
    /// # Errors
    ///
    /// Returns `GateError::FileSystem` if the database directory cannot be
    /// created, `GateError::Database` if database initialization fails and
    /// `GateError::Configuration` if the HTTP client cannot be built.
    pub async fn build(self, user: User) -> Result<SessionController> {
        let db_path = self.config.database_path()?;
        ensure_parent_dir(&db_path)?;

        let open_path = db_path.clone();
        let db = task::spawn_blocking(move || Database::new(&open_path))
            .await
            .map_err(GateError::join)??;

        let archive = match self.archive {
            Some(archive) => archive,
            None => Arc::new(SqliteArchive::new(db_path)),
        };
        let decomposer = match self.decomposer {
            Some(decomposer) => decomposer,
            None => Arc::new(GeminiDecomposer::new(self.config.gemini.clone())?),
        };

        Ok(SessionController::open(
            user,
            Box::new(db),
            archive,
            decomposer,
            self.config.focus_seconds,
        ))
    }
}
