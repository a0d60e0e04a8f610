//! The countdown state machine for one plan.

use log::debug;
use serde::Serialize;

use crate::{models::Plan, time_codec};

/// Observable state of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerState {
    /// No step holds the countdown
    NoActiveStep,
    /// The active step is counting down
    ActiveRunning(String),
    /// The active step is stopped; an explicit action resumes it
    ActivePaused(String),
    /// The user is editing this step's remaining time
    Editing(String),
}

/// Events fired by timer transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// The running step's countdown reached zero
    Expired { step_id: String, text: String },
    /// The last incomplete step was completed
    MissionComplete { plan_id: String, one_thing: String },
}

/// Result of applying one transition.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    /// Whether the plan or the engine state changed
    pub changed: bool,
    /// Event fired by the transition, if any
    pub event: Option<TimerEvent>,
}

impl Outcome {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed() -> Self {
        Self {
            changed: true,
            event: None,
        }
    }

    fn fired(event: TimerEvent) -> Self {
        Self {
            changed: true,
            event: Some(event),
        }
    }
}

/// Owns a plan and the single countdown running over its steps.
///
/// Steps stay in the plan's flat `Vec`; the engine tracks the active step
/// by index and mirrors it into the steps' `is_active` flags so the plan
/// can be persisted as-is. Every transition is total: requests that do not
/// apply in the current state return an unchanged [`Outcome`].
#[derive(Debug, Clone)]
pub struct TimerEngine {
    plan: Plan,
    active: Option<usize>,
    running: bool,
    editing: Option<usize>,
    /// The active step's current countdown already fired its expiry
    expired: bool,
    mission_signaled: bool,
}

impl TimerEngine {
    /// Takes ownership of a plan, freshly created or restored from storage.
    ///
    /// A step persisted as active comes back paused. Stored invariant
    /// violations are repaired: completed steps are forced inactive with no
    /// time left, remaining time is capped at the configured duration, and
    /// only the first eligible active step keeps its flag.
    pub fn new(mut plan: Plan) -> Self {
        for step in &mut plan.steps {
            if step.is_completed {
                step.is_active = false;
                step.time_left = 0;
            }
            step.time_left = step.time_left.min(step.original_focus_time);
        }

        let active = plan.steps.iter().position(|step| step.is_active);
        for (i, step) in plan.steps.iter_mut().enumerate() {
            if Some(i) != active {
                step.is_active = false;
            }
        }

        let mission_signaled = plan.is_complete();
        Self {
            plan,
            active,
            running: false,
            editing: None,
            expired: false,
            mission_signaled,
        }
    }

    /// The plan as currently mutated by the engine.
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Consumes the engine, returning its plan.
    pub fn into_plan(self) -> Plan {
        self.plan
    }

    /// Current state.
    pub fn state(&self) -> TimerState {
        if let Some(i) = self.editing {
            return TimerState::Editing(self.plan.steps[i].id.clone());
        }
        match self.active {
            None => TimerState::NoActiveStep,
            Some(i) if self.running => TimerState::ActiveRunning(self.plan.steps[i].id.clone()),
            Some(i) => TimerState::ActivePaused(self.plan.steps[i].id.clone()),
        }
    }

    /// Whether the countdown is ticking.
    pub fn is_running(&self) -> bool {
        self.running && self.active.is_some() && self.editing.is_none()
    }

    /// Activates a step and starts its countdown.
    ///
    /// Ignored while another step is active, while editing, or for a
    /// completed or unknown step. Starting the paused active step resumes
    /// it.
    pub fn start(&mut self, step_id: &str) -> Outcome {
        let Some(idx) = self.plan.step_index(step_id) else {
            return Outcome::unchanged();
        };
        if self.plan.steps[idx].is_completed || self.editing.is_some() {
            return Outcome::unchanged();
        }

        match self.active {
            Some(active) if active == idx => {
                if self.running {
                    Outcome::unchanged()
                } else {
                    self.running = true;
                    Outcome::changed()
                }
            }
            Some(_) => Outcome::unchanged(),
            None => {
                self.active = Some(idx);
                self.running = true;
                self.expired = false;
                self.plan.steps[idx].is_active = true;
                debug!("Activated step {step_id}");
                Outcome::changed()
            }
        }
    }

    /// Pauses or resumes the active step.
    ///
    /// With no active step this behaves like [`TimerEngine::start`]. A
    /// toggle aimed at any other step while one is active is ignored, as
    /// are toggles during an edit.
    pub fn toggle(&mut self, step_id: &str) -> Outcome {
        if self.editing.is_some() {
            return Outcome::unchanged();
        }
        match self.active {
            None => self.start(step_id),
            Some(active) if self.plan.steps[active].id == step_id => {
                self.running = !self.running;
                Outcome::changed()
            }
            Some(_) => Outcome::unchanged(),
        }
    }

    /// Advances the running countdown by one second.
    ///
    /// Reaching zero stops the countdown and fires [`TimerEvent::Expired`],
    /// once per countdown. A countdown resumed or edited at zero expires on
    /// its next tick; one that already fired just stops.
    pub fn tick(&mut self) -> Outcome {
        if !self.is_running() {
            return Outcome::unchanged();
        }
        let Some(idx) = self.active else {
            return Outcome::unchanged();
        };

        let step = &mut self.plan.steps[idx];
        if step.time_left > 0 {
            step.time_left -= 1;
            if step.time_left > 0 {
                return Outcome::changed();
            }
        }

        self.running = false;
        if self.expired {
            return Outcome::changed();
        }
        self.expired = true;
        debug!("Countdown for step {} expired", step.id);
        Outcome::fired(TimerEvent::Expired {
            step_id: step.id.clone(),
            text: step.text.clone(),
        })
    }

    /// Suspends ticking and starts editing a step's remaining time.
    ///
    /// Returns the text to pre-fill the editor with, or `None` when the
    /// step is unknown or completed.
    pub fn request_edit(&mut self, step_id: &str) -> Option<String> {
        let idx = self.plan.step_index(step_id)?;
        let step = &self.plan.steps[idx];
        if step.is_completed {
            return None;
        }

        self.running = false;
        self.editing = Some(idx);
        Some(time_codec::encode_for_input(step.time_left))
    }

    /// Applies an edited duration to a step.
    ///
    /// Both the remaining and configured durations take the decoded value.
    /// The active step resumes running afterwards; any other step returns
    /// the engine to the state it had before the edit, paused.
    pub fn commit_edit(&mut self, step_id: &str, raw: &str) -> Outcome {
        let Some(idx) = self.plan.step_index(step_id) else {
            return Outcome::unchanged();
        };
        if self.plan.steps[idx].is_completed {
            return Outcome::unchanged();
        }
        if matches!(self.editing, Some(editing) if editing != idx) {
            return Outcome::unchanged();
        }

        let seconds = time_codec::decode(raw);
        let step = &mut self.plan.steps[idx];
        step.time_left = seconds;
        step.original_focus_time = seconds;

        self.editing = None;
        self.running = self.active == Some(idx);
        if self.running {
            self.expired = false;
        }
        debug!("Step {step_id} set to {seconds}s");
        Outcome::changed()
    }

    /// Leaves edit mode without touching the step.
    pub fn cancel_edit(&mut self, step_id: &str) -> Outcome {
        match (self.editing, self.plan.step_index(step_id)) {
            (Some(editing), Some(idx)) if editing == idx => {
                self.editing = None;
                Outcome::changed()
            }
            _ => Outcome::unchanged(),
        }
    }

    /// Marks a step completed.
    ///
    /// Fires [`TimerEvent::MissionComplete`] when this was the last
    /// incomplete step, once per plan.
    pub fn complete(&mut self, step_id: &str) -> Outcome {
        let Some(idx) = self.plan.step_index(step_id) else {
            return Outcome::unchanged();
        };
        let step = &mut self.plan.steps[idx];
        if step.is_completed {
            return Outcome::unchanged();
        }

        step.is_completed = true;
        step.is_active = false;
        step.time_left = 0;

        if self.active == Some(idx) {
            self.active = None;
            self.running = false;
        }
        if self.editing == Some(idx) {
            self.editing = None;
        }

        if self.plan.is_complete() && !self.mission_signaled {
            self.mission_signaled = true;
            return Outcome::fired(TimerEvent::MissionComplete {
                plan_id: self.plan.id.clone(),
                one_thing: self.plan.one_thing.clone(),
            });
        }
        Outcome::changed()
    }

    /// Drops the active and editing state; remaining times are kept.
    pub fn abort(&mut self) -> Outcome {
        if self.active.is_none() && self.editing.is_none() {
            return Outcome::unchanged();
        }
        if let Some(idx) = self.active.take() {
            self.plan.steps[idx].is_active = false;
        }
        self.running = false;
        self.editing = None;
        Outcome::changed()
    }
}
