//! Derived status of a step.

use serde::{Deserialize, Serialize};

/// Display status of a step, derived from its completion and active flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step has not been started
    Todo,

    /// Step holds the plan's countdown
    Active,

    /// Step has been completed
    Done,
}

impl StepStatus {
    /// Lowercase name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Todo => "todo",
            StepStatus::Active => "active",
            StepStatus::Done => "done",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use noisegate_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Done.with_icon(), "✓ Done");
    /// assert_eq!(StepStatus::Active.with_icon(), "➤ Active");
    /// assert_eq!(StepStatus::Todo.with_icon(), "○ Todo");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Done => "✓ Done",
            StepStatus::Active => "➤ Active",
            StepStatus::Todo => "○ Todo",
        }
    }
}
