#![allow(dead_code)]

use std::path::PathBuf;

use async_trait::async_trait;
use noisegate_core::{Decomposer, Decomposition, GateError, Result, User};
use tempfile::TempDir;

/// Temporary directory holding a database path.
pub fn create_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("data").join("noisegate.db");
    (temp_dir, db_path)
}

pub fn test_user(id: &str) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        name: None,
    }
}

pub fn decomposition(goal: &str, steps: &[&str]) -> Decomposition {
    Decomposition {
        one_thing: goal.to_string(),
        steps: steps.iter().map(|s| (*s).to_string()).collect(),
        call_to_action: "Do it now.".to_string(),
    }
}

/// Decomposer returning a fixed three-step plan for any goal.
pub struct ScriptedDecomposer;

#[async_trait]
impl Decomposer for ScriptedDecomposer {
    async fn decompose(&self, goal: &str) -> Result<Decomposition> {
        Ok(decomposition(goal, &["Gather material", "Draft", "Review"]))
    }
}

/// Decomposer that always fails.
pub struct UnreachableDecomposer;

#[async_trait]
impl Decomposer for UnreachableDecomposer {
    async fn decompose(&self, _goal: &str) -> Result<Decomposition> {
        Err(GateError::communication("connection refused"))
    }
}
