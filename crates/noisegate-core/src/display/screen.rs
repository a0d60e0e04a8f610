//! Markdown rendering of the session's current screen.

use std::fmt;

use super::collections::fmt_history;
use crate::{
    models::Plan,
    session::{Screen, SessionController},
    time_codec,
    timer::TimerState,
};

/// Renders whatever screen a session is on.
///
/// # Examples
///
/// ```rust,no_run
/// # use noisegate_core::{display::ScreenView, SessionController};
/// # fn show(session: &SessionController) {
/// println!("{}", ScreenView(session));
/// # }
/// ```
pub struct ScreenView<'a>(pub &'a SessionController);

impl fmt::Display for ScreenView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        match (session.screen(), session.plan()) {
            (Screen::Capture, _) => fmt_capture(f, session),
            (Screen::Execution, Some(plan)) => fmt_execution(f, plan, &session.timer_state()),
            (Screen::Success, Some(plan)) => fmt_success(f, plan),
            (Screen::History, _) => {
                writeln!(f, "# History")?;
                writeln!(f)?;
                if session.is_loading_history() {
                    writeln!(f, "Loading...")
                } else {
                    fmt_history(f, session.history())
                }
            }
            (Screen::Execution | Screen::Success, None) => fmt_capture(f, session),
        }
    }
}

fn fmt_capture(f: &mut fmt::Formatter<'_>, session: &SessionController) -> fmt::Result {
    writeln!(f, "# Noise Gate")?;
    writeln!(f)?;
    writeln!(f, "What is the one thing you need to get done?")?;
    writeln!(
        f,
        "Each step gets {} on the clock.",
        time_codec::encode(session.focus_seconds())
    )?;

    if session.is_decomposing() {
        writeln!(f)?;
        writeln!(f, "Breaking the goal down...")?;
    }
    if !session.input().is_empty() {
        writeln!(f)?;
        writeln!(f, "> {}", session.input())?;
    }
    if let Some(error) = session.error() {
        writeln!(f)?;
        writeln!(f, "**Error:** {error}")?;
    }
    Ok(())
}

fn fmt_execution(f: &mut fmt::Formatter<'_>, plan: &Plan, state: &TimerState) -> fmt::Result {
    write!(f, "{plan}")?;

    let position = |id: &str| plan.step_index(id).map_or(0, |i| i + 1);
    match state {
        TimerState::NoActiveStep => writeln!(f, "Timer: idle"),
        TimerState::ActiveRunning(id) | TimerState::ActivePaused(id) => {
            let label = if matches!(state, TimerState::ActiveRunning(_)) {
                "running"
            } else {
                "paused"
            };
            let left = plan.step(id).map_or(0, |step| step.time_left);
            writeln!(
                f,
                "Timer: step {} {label}, {} left",
                position(id),
                time_codec::encode(left)
            )
        }
        TimerState::Editing(id) => writeln!(f, "Timer: editing step {}", position(id)),
    }
}

fn fmt_success(f: &mut fmt::Formatter<'_>, plan: &Plan) -> fmt::Result {
    writeln!(f, "# Mission complete")?;
    writeln!(f)?;
    writeln!(f, "## {}", plan.one_thing)?;
    writeln!(f)?;
    writeln!(f, "- Steps: {}/{}", plan.completed_count(), plan.steps.len())?;
    writeln!(f, "- Focus time: {}", plan.elapsed_time())?;
    writeln!(f)?;
    writeln!(f, "> {}", plan.call_to_action)
}
