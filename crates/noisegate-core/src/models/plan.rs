//! Plan model definition and derived queries.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Decomposition, Step};

/// One decomposition session: a goal and its ordered steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: String,

    /// The goal statement
    pub one_thing: String,

    /// Steps in execution order; never reordered
    pub steps: Vec<Step>,

    /// Motivational string shown with the plan
    pub call_to_action: String,

    /// Timestamp when the plan was created (UTC)
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
}

impl Plan {
    /// Builds a new plan from a decomposition, seeding every step with
    /// `focus_seconds` of countdown.
    pub fn from_decomposition(decomposition: Decomposition, focus_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            one_thing: decomposition.one_thing,
            steps: decomposition
                .steps
                .into_iter()
                .map(|text| Step::new(text, focus_seconds))
                .collect(),
            call_to_action: decomposition.call_to_action,
            created_at: Timestamp::now(),
        }
    }

    /// A plan is complete once every step is.
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|step| step.is_completed)
    }

    /// Number of completed steps.
    pub fn completed_count(&self) -> usize {
        self.steps.iter().filter(|step| step.is_completed).count()
    }

    /// Index of the step with the given id.
    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == step_id)
    }

    /// Step with the given id.
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    /// Step at a 1-based position, as shown to the user.
    pub fn step_at(&self, position: usize) -> Option<&Step> {
        position.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// The step currently holding the countdown, if any.
    pub fn active_step(&self) -> Option<&Step> {
        self.steps.iter().find(|step| step.is_active)
    }

    /// Percentage of completed steps, rounded half up.
    ///
    /// ```rust
    /// # use noisegate_core::models::{Decomposition, Plan};
    /// let mut plan = Plan::from_decomposition(
    ///     Decomposition {
    ///         one_thing: "Ship".into(),
    ///         steps: vec!["a".into(), "b".into(), "c".into()],
    ///         call_to_action: "Go".into(),
    ///     },
    ///     1500,
    /// );
    /// plan.steps[0].is_completed = true;
    /// assert_eq!(plan.progress_percent(), 33);
    /// ```
    pub fn progress_percent(&self) -> u32 {
        let total = self.steps.len() as u64;
        if total == 0 {
            return 0;
        }
        let completed = self.completed_count() as u64;
        ((completed * 200 + total) / (total * 2)) as u32
    }

    /// Total focus seconds spent across all steps.
    pub fn elapsed_seconds(&self) -> u64 {
        self.steps
            .iter()
            .map(|step| u64::from(step.elapsed_seconds()))
            .sum()
    }

    /// Total focus time spent, as `"{h}h {m}m"` or `"{m}m"`.
    pub fn elapsed_time(&self) -> String {
        let total = self.elapsed_seconds();
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }
}
