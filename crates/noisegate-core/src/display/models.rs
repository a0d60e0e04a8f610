//! Display implementations for domain models.
//!
//! All output is markdown so the CLI renderer can style it; with colors
//! disabled it is printed as-is.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    models::{HistoryEntry, Plan, Step, StepStatus},
    time_codec,
};

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.one_thing)?;
        writeln!(f)?;
        writeln!(f, "> {}", self.call_to_action)?;
        writeln!(f)?;

        writeln!(
            f,
            "- Progress: {}% ({}/{} steps)",
            self.progress_percent(),
            self.completed_count(),
            self.steps.len()
        )?;
        writeln!(f, "- Focus time: {}", self.elapsed_time())?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for (i, step) in self.steps.iter().enumerate() {
            step.fmt_step(f, Some(i + 1))?;
        }

        Ok(())
    }
}

impl Step {
    /// Format the step, numbered when shown inside a plan.
    fn fmt_step(&self, f: &mut fmt::Formatter<'_>, position: Option<usize>) -> fmt::Result {
        match position {
            Some(n) => writeln!(f, "### {n}. {} ({})", self.text, self.status().with_icon())?,
            None => writeln!(f, "### {} ({})", self.text, self.status().with_icon())?,
        }
        writeln!(f)?;

        if self.is_completed {
            writeln!(
                f,
                "- Focused: {}",
                time_codec::encode(self.elapsed_seconds())
            )?;
        } else {
            writeln!(
                f,
                "- Time left: {} of {}",
                time_codec::encode(self.time_left),
                time_codec::encode(self.original_focus_time)
            )?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_step(f, None)
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.plan.one_thing)?;
        writeln!(f)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.plan.created_at))?;
        writeln!(f, "- Steps: {}", self.plan.steps.len())?;
        writeln!(f, "- Focus time: {}", self.plan.elapsed_time())?;
        writeln!(f)?;
        writeln!(f, "{}", self.plan.call_to_action)?;
        writeln!(f)
    }
}
