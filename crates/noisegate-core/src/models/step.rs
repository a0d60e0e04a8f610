//! Step model definition and related functionality.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StepStatus;

/// One actionable unit of a plan with its own countdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    /// Unique identifier, stable for the step's lifetime
    pub id: String,

    /// Instruction text, immutable after creation
    pub text: String,

    /// Set once the step is done; never reset
    pub is_completed: bool,

    /// True for at most one step of a plan
    pub is_active: bool,

    /// Remaining countdown in seconds
    pub time_left: u32,

    /// Duration the step was most recently configured with, in seconds
    pub original_focus_time: u32,
}

impl Step {
    /// Creates a pending step whose countdown starts at `focus_seconds`.
    pub fn new(text: impl Into<String>, focus_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            is_completed: false,
            is_active: false,
            time_left: focus_seconds,
            original_focus_time: focus_seconds,
        }
    }

    /// Seconds of focus already spent on this step.
    pub fn elapsed_seconds(&self) -> u32 {
        self.original_focus_time.saturating_sub(self.time_left)
    }

    /// Derived status used for display.
    pub fn status(&self) -> StepStatus {
        if self.is_completed {
            StepStatus::Done
        } else if self.is_active {
            StepStatus::Active
        } else {
            StepStatus::Todo
        }
    }
}
