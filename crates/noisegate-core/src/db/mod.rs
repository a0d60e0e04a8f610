//! SQLite storage for plans, history and local accounts.
//!
//! One [`Database`] wraps one connection. Queries are grouped by concern:
//! the in-progress plan document per user ([`plan_queries`]), the archive of
//! plan snapshots ([`history_queries`]) and local accounts
//! ([`user_queries`]).

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, GateError, Result};

pub mod history_queries;
pub mod migrations;
pub mod plan_queries;
pub mod user_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Creates the directory a database file lives in.
pub fn ensure_parent_dir(db_path: &Path) -> Result<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| GateError::FileSystem {
                path: PathBuf::from(parent),
                source: e,
            })
        }
        _ => Ok(()),
    }
}
