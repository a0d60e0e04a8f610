//! The screen state machine around one user's work.
//!
//! [`SessionController`] decides which screen is showing and routes user
//! actions to the [`TimerEngine`], the [`PlanStore`] and the asynchronous
//! collaborators.
//!
//! ```text
//!            decomposition applied            mission complete
//!  Capture ─────────────────────▶ Execution ─────────────────▶ Success
//!     ▲  ▲          abort            │                            │
//!     │  └───────────────────────────┘                            │
//!     └────────────────────── start new mission ──────────────────┘
//!
//!  Capture / Success ──open history──▶ History ──close──▶ (per plan state)
//! ```
//!
//! # Asynchronous requests
//!
//! Decomposition and history fetches are split into a `begin_*` step that
//! issues a ticket and a `finish_*` step that applies the result. Every
//! ticket carries a generation number; a result whose generation is no
//! longer the latest, or that arrives after the user left the screen that
//! asked for it, is discarded. [`SessionController::submit_goal`] and
//! [`SessionController::open_history`] wire the two halves together around
//! a shared `Mutex` without holding the lock across the request.
//!
//! # Persistence
//!
//! Every timer transition that changes the plan is saved to the
//! [`PlanStore`] straight away. Store calls are synchronous; on a
//! multi-threaded runtime they run through `block_in_place` so the worker
//! holding the session does not stall other tasks. Save failures are logged
//! and the session carries on from its in-memory state.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::{
    runtime::Handle,
    sync::{broadcast, Mutex},
    task::JoinHandle,
};

use crate::{
    decompose::Decomposer,
    error::Result,
    models::{Decomposition, HistoryEntry, Plan, User},
    store::{run_blocking, ArchiveStore, PlanStore, HISTORY_LIMIT},
    timer::{Outcome, TimerEngine, TimerEvent, TimerState},
};

pub mod builder;


pub use builder::SessionBuilder;

/// Message shown for every failed decomposition.
pub const DECOMPOSITION_FAILED_MESSAGE: &str = "Communication with the AI failed. Try again.";

const EVENT_CAPACITY: usize = 16;

/// Screen currently presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Goal entry
    Capture,
    /// Working through the plan's steps
    Execution,
    /// Every step is done
    Success,
    /// Archived plans
    History,
}

impl Screen {
    /// Lowercase name of the screen.
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Capture => "capture",
            Screen::Execution => "execution",
            Screen::Success => "success",
            Screen::History => "history",
        }
    }
}

/// What happened to a submitted goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecompositionOutcome {
    /// A new plan was created and the session moved to execution
    Applied,
    /// The request failed; the message is meant for the user
    Failed(String),
    /// The result arrived after the session moved on and was dropped
    Stale,
    /// No request was issued: blank goal, wrong screen, or one already
    /// in flight
    Rejected,
}

/// Proof that a decomposition request was issued.
#[derive(Debug)]
pub struct DecompositionTicket {
    generation: u64,
    goal: String,
}

impl DecompositionTicket {
    /// The goal text to decompose.
    pub fn goal(&self) -> &str {
        &self.goal
    }
}

/// Proof that a history fetch was issued.
#[derive(Debug)]
pub struct HistoryTicket {
    generation: u64,
}

/// Coordinates screens, the timer and persistence for one signed-in user.
pub struct SessionController {
    user: User,
    store: Box<dyn PlanStore>,
    archive: Arc<dyn ArchiveStore>,
    decomposer: Arc<dyn Decomposer>,
    focus_seconds: u32,

    screen: Screen,
    engine: Option<TimerEngine>,
    input: String,
    error: Option<String>,

    generation: u64,
    pending_decomposition: Option<u64>,
    pending_history: Option<u64>,
    history: Vec<HistoryEntry>,

    events: broadcast::Sender<TimerEvent>,
    archive_tasks: Vec<JoinHandle<()>>,
}

impl SessionController {
    /// Opens a session for `user`, resuming a stored plan if there is one.
    ///
    /// A stored plan with steps left opens on [`Screen::Execution`], a
    /// completed one on [`Screen::Success`]. Without a usable stored plan
    /// the session starts on [`Screen::Capture`].
    pub fn open(
        user: User,
        store: Box<dyn PlanStore>,
        archive: Arc<dyn ArchiveStore>,
        decomposer: Arc<dyn Decomposer>,
        focus_seconds: u32,
    ) -> Self {
        let stored = run_blocking(|| store.load(&user.id)).unwrap_or_else(|e| {
            warn!("Failed to load stored plan for {}: {e}", user.id);
            None
        });

        let engine = stored.map(TimerEngine::new);
        let screen = match &engine {
            Some(engine) if engine.plan().is_complete() => Screen::Success,
            Some(_) => Screen::Execution,
            None => Screen::Capture,
        };
        debug!("Session for {} opened on {}", user.id, screen.as_str());

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            user,
            store,
            archive,
            decomposer,
            focus_seconds,
            screen,
            engine,
            input: String::new(),
            error: None,
            generation: 0,
            pending_decomposition: None,
            pending_history: None,
            history: Vec::new(),
            events,
            archive_tasks: Vec::new(),
        }
    }

    // Accessors

    /// The signed-in user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The plan being worked on or just completed.
    pub fn plan(&self) -> Option<&Plan> {
        self.engine.as_ref().map(TimerEngine::plan)
    }

    /// Timer state, [`TimerState::NoActiveStep`] without a plan.
    pub fn timer_state(&self) -> TimerState {
        self.engine
            .as_ref()
            .map_or(TimerState::NoActiveStep, TimerEngine::state)
    }

    /// Whether a countdown is ticking.
    pub fn is_running(&self) -> bool {
        self.engine.as_ref().is_some_and(TimerEngine::is_running)
    }

    /// Goal text retained on the capture screen.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Message from the last failed request, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// History loaded by the last completed fetch.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Whether a decomposition request is in flight.
    pub fn is_decomposing(&self) -> bool {
        self.pending_decomposition.is_some()
    }

    /// Whether a history fetch is in flight.
    pub fn is_loading_history(&self) -> bool {
        self.pending_history.is_some()
    }

    /// Countdown new steps start with, in seconds.
    pub fn focus_seconds(&self) -> u32 {
        self.focus_seconds
    }

    /// Subscribes to expiry and mission-complete events.
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    // Decomposition

    /// Issues a decomposition request for `goal`.
    ///
    /// Returns `None` without issuing anything when the goal is blank, the
    /// session is not on the capture screen, or a request is already in
    /// flight.
    pub fn begin_decomposition(&mut self, goal: &str) -> Option<DecompositionTicket> {
        let trimmed = goal.trim();
        if self.screen != Screen::Capture || trimmed.is_empty() {
            return None;
        }
        if self.pending_decomposition.is_some() {
            debug!("Decomposition already in flight, rejecting submit");
            return None;
        }

        self.input = goal.to_string();
        self.error = None;
        self.generation += 1;
        self.pending_decomposition = Some(self.generation);

        Some(DecompositionTicket {
            generation: self.generation,
            goal: trimmed.to_string(),
        })
    }

    /// Applies the result of a decomposition request.
    pub fn finish_decomposition(
        &mut self,
        ticket: DecompositionTicket,
        result: Result<Decomposition>,
    ) -> DecompositionOutcome {
        if self.pending_decomposition != Some(ticket.generation) || self.screen != Screen::Capture
        {
            debug!("Discarding stale decomposition {}", ticket.generation);
            return DecompositionOutcome::Stale;
        }
        self.pending_decomposition = None;

        let decomposition = match result {
            Ok(decomposition) if !decomposition.steps.is_empty() => decomposition,
            Ok(_) => {
                warn!("Decomposition returned no steps");
                return self.fail_decomposition();
            }
            Err(e) => {
                warn!("Decomposition failed: {e}");
                return self.fail_decomposition();
            }
        };

        let plan = Plan::from_decomposition(decomposition, self.focus_seconds);
        info!(
            "Mission {} created with {} steps",
            plan.id,
            plan.steps.len()
        );
        if let Err(e) = self.save(&plan) {
            warn!("Failed to save new plan {}: {e}", plan.id);
        }

        self.engine = Some(TimerEngine::new(plan));
        self.screen = Screen::Execution;
        self.input.clear();
        self.error = None;
        DecompositionOutcome::Applied
    }

    fn save(&self, plan: &Plan) -> Result<()> {
        run_blocking(|| self.store.save(&self.user.id, plan))
    }

    fn fail_decomposition(&mut self) -> DecompositionOutcome {
        self.error = Some(DECOMPOSITION_FAILED_MESSAGE.to_string());
        DecompositionOutcome::Failed(DECOMPOSITION_FAILED_MESSAGE.to_string())
    }

    /// Submits a goal and waits for the decomposition.
    ///
    /// The lock is released while the request is in flight, so ticks and
    /// other actions keep flowing.
    pub async fn submit_goal(session: &Mutex<Self>, goal: &str) -> DecompositionOutcome {
        let (ticket, decomposer) = {
            let mut guard = session.lock().await;
            match guard.begin_decomposition(goal) {
                Some(ticket) => (ticket, Arc::clone(&guard.decomposer)),
                None => return DecompositionOutcome::Rejected,
            }
        };

        let result = decomposer.decompose(ticket.goal()).await;
        session.lock().await.finish_decomposition(ticket, result)
    }

    // Timer

    /// Activates a step and starts its countdown.
    pub fn start_step(&mut self, step_id: &str) -> Outcome {
        self.apply(|engine| engine.start(step_id))
    }

    /// Pauses or resumes a step.
    pub fn toggle_step(&mut self, step_id: &str) -> Outcome {
        self.apply(|engine| engine.toggle(step_id))
    }

    /// Advances the running countdown by one second.
    pub fn tick(&mut self) -> Outcome {
        self.apply(TimerEngine::tick)
    }

    /// Enters edit mode for a step, returning the text to pre-fill.
    pub fn request_edit(&mut self, step_id: &str) -> Option<String> {
        if self.screen != Screen::Execution {
            return None;
        }
        self.engine.as_mut()?.request_edit(step_id)
    }

    /// Applies an edited remaining time to a step.
    pub fn commit_edit(&mut self, step_id: &str, raw: &str) -> Outcome {
        self.apply(|engine| engine.commit_edit(step_id, raw))
    }

    /// Leaves edit mode without changes.
    pub fn cancel_edit(&mut self, step_id: &str) -> Outcome {
        self.apply(|engine| engine.cancel_edit(step_id))
    }

    /// Marks a step completed. Completing the last step moves the session
    /// to [`Screen::Success`] and archives the plan.
    pub fn complete_step(&mut self, step_id: &str) -> Outcome {
        self.apply(|engine| engine.complete(step_id))
    }

    fn apply<F>(&mut self, transition: F) -> Outcome
    where
        F: FnOnce(&mut TimerEngine) -> Outcome,
    {
        if self.screen != Screen::Execution {
            return Outcome::default();
        }
        let Some(engine) = self.engine.as_mut() else {
            return Outcome::default();
        };

        let outcome = transition(engine);
        if outcome.changed {
            let (store, user_id, plan) = (&self.store, &self.user.id, engine.plan());
            if let Err(e) = run_blocking(|| store.save(user_id, plan)) {
                warn!("Failed to save plan {}: {e}", plan.id);
            }
        }

        if let Some(event) = &outcome.event {
            if let TimerEvent::MissionComplete { plan_id, .. } = event {
                info!("Mission {plan_id} completed");
                self.screen = Screen::Success;
                self.archive_plan();
            }
            // Nobody listening is fine.
            let _ = self.events.send(event.clone());
        }
        outcome
    }

    fn archive_plan(&mut self) {
        let Some(plan) = self.plan().cloned() else {
            return;
        };
        let archive = Arc::clone(&self.archive);
        let user_id = self.user.id.clone();

        match Handle::try_current() {
            Ok(handle) => {
                let task = handle.spawn(async move {
                    if let Err(e) = archive.append(&user_id, &plan).await {
                        warn!("Failed to archive plan {}: {e}", plan.id);
                    }
                });
                self.archive_tasks.push(task);
            }
            Err(_) => warn!("No async runtime, plan {} was not archived", plan.id),
        }
    }

    /// Hands over the background archive tasks spawned so far.
    pub fn take_archive_tasks(&mut self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut self.archive_tasks)
    }

    // Screen changes

    /// Abandons the current plan and returns to the capture screen.
    ///
    /// Only applies during execution. Returns whether anything happened.
    pub fn abort(&mut self) -> bool {
        if self.screen != Screen::Execution {
            return false;
        }
        if let Some(mut engine) = self.engine.take() {
            let _ = engine.abort();
            info!("Mission {} aborted", engine.plan().id);
        }
        self.reset_to_capture();
        true
    }

    /// Leaves the success screen for a fresh capture form.
    pub fn start_new_mission(&mut self) -> bool {
        if self.screen != Screen::Success {
            return false;
        }
        self.engine = None;
        self.reset_to_capture();
        true
    }

    fn reset_to_capture(&mut self) {
        if let Err(e) = run_blocking(|| self.store.clear(&self.user.id)) {
            warn!("Failed to clear stored plan: {e}");
        }
        self.screen = Screen::Capture;
        self.input.clear();
        self.error = None;
    }

    // History

    /// Switches to the history screen and issues a fetch.
    ///
    /// Only possible from the capture and success screens. A decomposition
    /// still in flight becomes stale.
    pub fn begin_history(&mut self) -> Option<HistoryTicket> {
        if !matches!(self.screen, Screen::Capture | Screen::Success) {
            return None;
        }

        self.pending_decomposition = None;
        self.generation += 1;
        self.pending_history = Some(self.generation);
        self.history.clear();
        self.screen = Screen::History;

        Some(HistoryTicket {
            generation: self.generation,
        })
    }

    /// Applies a history fetch result. A failed fetch shows an empty list.
    ///
    /// Returns `false` when the result was stale and dropped.
    pub fn finish_history(
        &mut self,
        ticket: HistoryTicket,
        result: Result<Vec<HistoryEntry>>,
    ) -> bool {
        if self.pending_history != Some(ticket.generation) || self.screen != Screen::History {
            debug!("Discarding stale history fetch {}", ticket.generation);
            return false;
        }
        self.pending_history = None;

        self.history = result.unwrap_or_else(|e| {
            warn!("Failed to load history: {e}");
            Vec::new()
        });
        true
    }

    /// Opens the history screen and loads the most recent entries.
    pub async fn open_history(session: &Mutex<Self>) -> bool {
        let (ticket, archive, user_id) = {
            let mut guard = session.lock().await;
            match guard.begin_history() {
                Some(ticket) => (ticket, Arc::clone(&guard.archive), guard.user.id.clone()),
                None => return false,
            }
        };

        let result = archive.list_recent(&user_id, HISTORY_LIMIT).await;
        session.lock().await.finish_history(ticket, result)
    }

    /// Leaves the history screen for whichever screen the plan calls for.
    pub fn close_history(&mut self) -> bool {
        if self.screen != Screen::History {
            return false;
        }
        self.pending_history = None;
        self.screen = match &self.engine {
            Some(engine) if engine.plan().is_complete() => Screen::Success,
            Some(_) => Screen::Execution,
            None => Screen::Capture,
        };
        true
    }
}
