//! Focus timer: the per-plan countdown state machine and its tick source.
//!
//! [`TimerEngine`] owns a [`Plan`](crate::models::Plan) while it is being
//! worked on. At most one step is active at a time; the active step is
//! either running or paused, and any step that is not completed can be put
//! into edit mode to change its remaining time.
//!
//! ```text
//!                  start / toggle
//!  NoActiveStep ─────────────────▶ ActiveRunning ◀──┐
//!       ▲                             │   ▲          │ commit_edit
//!       │ complete / abort     toggle │   │ toggle   │ (active step)
//!       │                             ▼   │          │
//!       └──────────────────────── ActivePaused ──▶ Editing
//!                                  (tick to 0)   request_edit
//! ```
//!
//! Transitions return an [`Outcome`] carrying the event they fired, if any.
//! Expiry and mission-complete are each fired once; notification side
//! effects belong to whoever subscribes to them.
//!
//! [`TickScheduler`] is the cooperative source of once-per-second ticks.

mod engine;
mod ticker;

#[cfg(test)]
mod tests;

pub use engine::{Outcome, TimerEngine, TimerEvent, TimerState};
pub use ticker::TickScheduler;
