//! Command handlers for the `ng` binary.
//!
//! Each invocation opens the session for the signed-in user, applies one
//! command and renders the resulting screen. The session state lives in the
//! database, so consecutive invocations pick up where the last one stopped.
//!
//! `start`, `resume` and `edit` on the active step keep the process in the
//! foreground while the countdown runs. Ctrl-C pauses the countdown, which
//! is already saved second by second.

use std::{io::Write, ops::ControlFlow};

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use log::{debug, info, warn};
use noisegate_core::{
    db::ensure_parent_dir, time_codec, Config, Database, DecompositionOutcome, GateError,
    IdentityProvider, LocalIdentity, OperationStatus, Screen, ScreenView, SessionBuilder,
    SessionController, TickScheduler, TimerState, User,
};
use tokio::{sync::Mutex, task};

use crate::{args::Commands, notifier::Notifier, renderer::TerminalRenderer};

/// Sign in
#[derive(Args)]
pub struct LoginArgs {
    /// Email address identifying the account
    pub email: String,
    /// Display name; defaults to the part of the email before '@'
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Start a mission
#[derive(Args)]
pub struct MissionArgs {
    /// The goal, in your own words
    #[arg(required = true, num_args = 1..)]
    pub goal: Vec<String>,
}

impl MissionArgs {
    fn goal(&self) -> String {
        self.goal.join(" ")
    }
}

/// Start a step
#[derive(Args)]
pub struct StartArgs {
    /// Step number as shown by `status`
    pub step: usize,
}

/// Complete a step
#[derive(Args)]
pub struct DoneArgs {
    /// Step number as shown by `status`
    pub step: usize,
}

/// Edit a step's remaining time
#[derive(Args)]
pub struct EditArgs {
    /// Step number as shown by `status`
    pub step: usize,
    /// New remaining time: SS, MM:SS or HH:MM:SS
    pub time: String,
}

/// Runs commands against the local database.
pub struct Cli {
    config: Config,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(config: Config, renderer: TerminalRenderer) -> Self {
        Self { config, renderer }
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Login(args) => self.login(args).await,
            Commands::Logout => self.logout().await,
            Commands::Whoami => self.whoami().await,
            command => {
                let session = Mutex::new(self.open_session().await?);
                let mut notifier = Notifier::new(session.lock().await.subscribe());
                let result = self
                    .handle_session_command(&session, &mut notifier, command)
                    .await;
                notifier.drain(&self.renderer)?;
                self.finish_archiving(&session).await;
                result
            }
        }
    }

    // Identity

    async fn with_identity<F, T>(&self, action: F) -> Result<T>
    where
        F: FnOnce(&mut LocalIdentity) -> noisegate_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self
            .config
            .database_path()
            .context("Failed to resolve database path")?;

        task::spawn_blocking(move || {
            ensure_parent_dir(&db_path)?;
            let mut identity = LocalIdentity::new(Database::new(&db_path)?);
            action(&mut identity)
        })
        .await
        .context("Identity task failed")?
        .map_err(anyhow::Error::from)
    }

    async fn login(&self, args: LoginArgs) -> Result<()> {
        let LoginArgs { email, name } = args;
        let sign_in = self
            .with_identity(move |identity| identity.sign_in(&email, name.as_deref()))
            .await?;

        let message = if sign_in.is_new_user {
            format!(
                "Welcome, {}. Your account was created.",
                sign_in.user.display_name()
            )
        } else {
            format!("Welcome back, {}.", sign_in.user.display_name())
        };
        self.renderer
            .render(&OperationStatus::success(message).to_string())
    }

    async fn logout(&self) -> Result<()> {
        self.with_identity(|identity| identity.sign_out()).await?;
        self.renderer
            .render(&OperationStatus::success("Signed out").to_string())
    }

    async fn whoami(&self) -> Result<()> {
        match self.with_identity(|identity| identity.current_user()).await? {
            Some(user) => self.renderer.render(&format!(
                "Signed in as **{}** <{}>\n",
                user.display_name(),
                user.email
            )),
            None => self.renderer.render("Not signed in.\n"),
        }
    }

    async fn current_user(&self) -> Result<User> {
        self.with_identity(|identity| identity.require_user())
            .await
            .map_err(|e| match e.downcast_ref::<GateError>() {
                Some(GateError::NotSignedIn) => {
                    anyhow!("Not signed in. Run `ng login <email>` first.")
                }
                _ => e,
            })
    }

    async fn open_session(&self) -> Result<SessionController> {
        let user = self.current_user().await?;
        SessionBuilder::new()
            .with_config(self.config.clone())
            .build(user)
            .await
            .context("Failed to open session")
    }

    // Session commands

    async fn handle_session_command(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
        command: Commands,
    ) -> Result<()> {
        match command {
            Commands::Status => self.show(session, notifier).await,
            Commands::Mission(args) => self.mission(session, notifier, &args.goal()).await,
            Commands::Start(args) => self.start(session, notifier, args.step).await,
            Commands::Resume => self.resume(session, notifier).await,
            Commands::Done(args) => self.done(session, notifier, args.step).await,
            Commands::Edit(args) => self.edit(session, notifier, args.step, &args.time).await,
            Commands::Abort => self.abort(session).await,
            Commands::New => self.new_mission(session, notifier).await,
            Commands::History => self.history(session, notifier).await,
            Commands::Login(_) | Commands::Logout | Commands::Whoami => Ok(()),
        }
    }

    /// Prints pending alerts, then the current screen.
    async fn show(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
    ) -> Result<()> {
        notifier.drain(&self.renderer)?;
        let guard = session.lock().await;
        self.renderer.render(&ScreenView(&guard).to_string())
    }

    async fn mission(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
        goal: &str,
    ) -> Result<()> {
        match session.lock().await.screen() {
            Screen::Execution => bail!("A mission is in progress. Finish it or run `ng abort`."),
            Screen::Success => bail!("Mission complete. Run `ng new` to start another."),
            Screen::Capture | Screen::History => {}
        }

        info!("Decomposing goal");
        match SessionController::submit_goal(session, goal).await {
            DecompositionOutcome::Applied => self.show(session, notifier).await,
            DecompositionOutcome::Failed(message) => Err(anyhow!(message)),
            DecompositionOutcome::Rejected => bail!("The goal is empty."),
            DecompositionOutcome::Stale => {
                bail!("The session changed while the goal was being decomposed.")
            }
        }
    }

    async fn start(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
        position: usize,
    ) -> Result<()> {
        let step_id = self.step_id(session, position).await?;
        {
            let mut guard = session.lock().await;
            let _ = guard.start_step(&step_id);
            if guard.timer_state() != TimerState::ActiveRunning(step_id.clone()) {
                let reason = match guard.plan().and_then(|plan| plan.step(&step_id)) {
                    Some(step) if step.is_completed => "it is already done",
                    _ => "another step is active",
                };
                bail!("Cannot start step {position}: {reason}.");
            }
        }
        self.run_countdown(session, notifier).await
    }

    async fn resume(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
    ) -> Result<()> {
        {
            let mut guard = session.lock().await;
            let active = match guard.timer_state() {
                TimerState::ActivePaused(id) | TimerState::ActiveRunning(id) => id,
                _ => bail!("No step is paused. Use `ng start <n>`."),
            };
            let _ = guard.start_step(&active);
        }
        self.run_countdown(session, notifier).await
    }

    async fn done(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
        position: usize,
    ) -> Result<()> {
        let step_id = self.step_id(session, position).await?;
        let outcome = session.lock().await.complete_step(&step_id);
        if !outcome.changed {
            bail!("Step {position} is already done.");
        }
        self.show(session, notifier).await
    }

    async fn edit(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
        position: usize,
        time: &str,
    ) -> Result<()> {
        let step_id = self.step_id(session, position).await?;
        let running = {
            let mut guard = session.lock().await;
            let Some(previous) = guard.request_edit(&step_id) else {
                bail!("Step {position} is already done.");
            };
            debug!("Editing step {position}, was {previous}");
            let _ = guard.commit_edit(&step_id, time);
            let seconds = guard
                .plan()
                .and_then(|plan| plan.step(&step_id))
                .map_or(0, |step| step.time_left);
            self.renderer.render(
                &OperationStatus::success(format!(
                    "Step {position} set to {}",
                    time_codec::encode(seconds)
                ))
                .to_string(),
            )?;
            guard.is_running()
        };

        if running {
            self.run_countdown(session, notifier).await
        } else {
            self.show(session, notifier).await
        }
    }

    async fn abort(&self, session: &Mutex<SessionController>) -> Result<()> {
        if !session.lock().await.abort() {
            bail!("No mission in progress.");
        }
        self.renderer
            .render(&OperationStatus::success("Mission aborted").to_string())
    }

    async fn new_mission(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
    ) -> Result<()> {
        if !session.lock().await.start_new_mission() {
            bail!("Finish the current mission first, or run `ng abort`.");
        }
        self.show(session, notifier).await
    }

    async fn history(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
    ) -> Result<()> {
        if !SessionController::open_history(session).await {
            bail!("History is available once no mission is in progress.");
        }
        self.show(session, notifier).await?;
        session.lock().await.close_history();
        Ok(())
    }

    // Helpers

    async fn step_id(&self, session: &Mutex<SessionController>, position: usize) -> Result<String> {
        let guard = session.lock().await;
        if guard.screen() != Screen::Execution {
            bail!("No mission in progress. Start one with `ng mission <goal>`.");
        }
        guard
            .plan()
            .and_then(|plan| plan.step_at(position))
            .map(|step| step.id.clone())
            .ok_or_else(|| anyhow!("There is no step {position}."))
    }

    /// Ticks the running step once per second until it stops or the user
    /// presses Ctrl-C. Alerts print as soon as the countdown ends.
    async fn run_countdown(
        &self,
        session: &Mutex<SessionController>,
        notifier: &mut Notifier,
    ) -> Result<()> {
        let scheduler = TickScheduler::every_second();
        let ticking = scheduler.run(session, |session| {
            let _ = session.tick();
            print_progress(session);
            if session.is_running() {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        });

        tokio::select! {
            ticks = ticking => {
                println!();
                debug!("Countdown ended after {ticks} ticks");
                notifier.drain(&self.renderer)?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                println!();
                let mut guard = session.lock().await;
                if let TimerState::ActiveRunning(id) = guard.timer_state() {
                    let _ = guard.toggle_step(&id);
                    info!("Countdown paused");
                }
            }
        }

        self.show(session, notifier).await
    }

    async fn finish_archiving(&self, session: &Mutex<SessionController>) {
        let tasks = session.lock().await.take_archive_tasks();
        for task in tasks {
            if let Err(e) = task.await {
                warn!("Archive task failed: {e}");
            }
        }
    }
}

fn print_progress(session: &SessionController) {
    let Some(step) = session.plan().and_then(|plan| plan.active_step()) else {
        return;
    };
    let position = session
        .plan()
        .and_then(|plan| plan.step_index(&step.id))
        .map_or(0, |i| i + 1);

    print!(
        "\r{}  step {position}: {}\x1b[K",
        time_codec::encode(step.time_left),
        step.text
    );
    let _ = std::io::stdout().flush();
}
