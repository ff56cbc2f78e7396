//! Plan status polling.
//!
//! [`PollingController`] repeatedly fetches the status endpoint through a
//! [`FallbackRequestClient`], merges each answer into the session's plan and
//! forwards render updates to the [`Renderer`].
//!
//! # State machine
//!
//! ```text
//!            start()                 > max_retries failures
//!   Idle ───────────────▶ Polling ─────────────────────────▶ Backoff
//!     ▲                   │   ▲                                 │
//!     │       COMPLETED / │   └──── cooldown elapsed, ──────────┘
//!     │         stop()    ▼         slower interval
//!     └──── start() ── Stopped
//! ```
//!
//! A session owns exactly one timer: a spawned task that ticks at the base
//! interval, sleeps through the backoff cooldown, and resumes at the slower
//! interval. Starting a new session aborts the previous task first. Every
//! result is checked against the current session id before it touches state,
//! so a late answer for a stopped session is dropped.

mod session;


use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::{debug, info, warn};
use serde_json::Value;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

pub use session::{PollingSession, SessionId};

use crate::{
    config::PollingConfig,
    display::{LogLine, StatusView},
    error::Result,
    fallback::FallbackRequestClient,
    models::{LogEntry, PlanStatus, StatusOutcome},
    render::Renderer,
};

pub const STARTING_MESSAGE: &str = "Starting plan...";
pub const COMPLETED_MESSAGE: &str = "Plan completed!";
pub const NO_DATA_MESSAGE: &str = "No plan data received";
pub const NOT_FOUND_HINT: &str =
    "Hint: the service is not ready or no plan has been created yet. Send a query to start.";
pub const RESUMING_MESSAGE: &str = "Continuing status checks at a lower frequency";

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Polling { interval: Duration },
    Backoff,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Continue,
    Backoff,
    Finished,
}

/// Drives the repeating status check for one session at a time.
///
/// Cloning is cheap; clones share the same session and timer.
#[derive(Clone)]
pub struct PollingController {
    inner: Arc<Inner>,
}

struct Inner {
    client: FallbackRequestClient,
    status_urls: Vec<String>,
    config: PollingConfig,
    renderer: Arc<dyn Renderer>,
    state: Mutex<ControllerState>,
    phase: watch::Sender<PollPhase>,
}

#[derive(Default)]
struct ControllerState {
    session: Option<PollingSession>,
    timer: Option<JoinHandle<()>>,
    hide_timer: Option<JoinHandle<()>>,
    last_session: u64,
}

impl PollingController {
    /// Creates an idle controller polling `status_urls` in priority order.
    pub fn new(
        client: FallbackRequestClient,
        status_urls: Vec<String>,
        config: PollingConfig,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let (phase, _) = watch::channel(PollPhase::Idle);
        Self {
            inner: Arc::new(Inner {
                client,
                status_urls,
                config,
                renderer,
                state: Mutex::new(ControllerState::default()),
                phase,
            }),
        }
    }

    /// Starts a new session, cancelling any timer left by a previous one.
    ///
    /// Clears the log pane and step list, shows the status panel, and
    /// schedules the first tick one base interval from now.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&self) -> SessionId {
        let mut state = self.lock();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        if let Some(hide_timer) = state.hide_timer.take() {
            hide_timer.abort();
        }

        state.last_session += 1;
        let id = SessionId(state.last_session);
        let mut session = PollingSession::new(id);

        let renderer = self.inner.renderer.as_ref();
        renderer.show_status_panel();
        renderer.reset_status();
        emit_log(renderer, Some(&mut session), LogEntry::info(STARTING_MESSAGE));

        state.session = Some(session);
        self.set_phase(PollPhase::Polling {
            interval: self.inner.config.base_interval(),
        });
        state.timer = Some(tokio::spawn(self.clone().run(id)));

        info!("Started polling session {id}");
        id
    }

    /// Stops the current session. A no-op when nothing is polling.
    ///
    /// The status panel is hidden after the configured grace delay so the
    /// final state stays readable.
    pub fn stop(&self) {
        let mut state = self.lock();
        self.stop_locked(&mut state);
    }

    /// Stops the session only if `id` is still the current one. Returns
    /// whether anything was stopped.
    pub fn stop_session(&self, id: SessionId) -> bool {
        let mut state = self.lock();
        if state.session.as_ref().map(PollingSession::id) != Some(id) {
            return false;
        }
        self.stop_locked(&mut state)
    }

    /// Log sink shared with the chat handler. Messages already rendered in
    /// the current session are dropped.
    pub fn add_log(&self, entry: LogEntry) {
        let mut state = self.lock();
        emit_log(self.inner.renderer.as_ref(), state.session.as_mut(), entry);
    }

    /// Fetches and classifies the status once, outside any session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ClientError::Exhausted`] when no candidate URL answered.
    pub async fn fetch_status(&self) -> Result<StatusOutcome> {
        let value = self
            .inner
            .client
            .fetch_with_fallback(&self.inner.status_urls)
            .await?;
        Ok(StatusOutcome::classify(value))
    }

    pub fn phase(&self) -> PollPhase {
        *self.inner.phase.borrow()
    }

    /// Watches phase transitions.
    pub fn subscribe(&self) -> watch::Receiver<PollPhase> {
        self.inner.phase.subscribe()
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.lock().session.as_ref().map(PollingSession::id)
    }

    /// Consecutive failed polls in the current session.
    pub fn retry_count(&self) -> u32 {
        self.lock()
            .session
            .as_ref()
            .map_or(0, PollingSession::retry_count)
    }

    /// Snapshot of the current session's plan.
    pub fn plan(&self) -> Option<PlanStatus> {
        self.lock().session.as_ref().map(|s| s.plan().clone())
    }

    pub fn status_urls(&self) -> &[String] {
        &self.inner.status_urls
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: PollPhase) {
        self.inner.phase.send_replace(phase);
    }

    async fn run(self, id: SessionId) {
        let mut period = self.inner.config.base_interval();
        loop {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match self.poll_once(id).await {
                    TickOutcome::Continue => {}
                    TickOutcome::Backoff => break,
                    TickOutcome::Finished => return,
                }
            }

            time::sleep(self.inner.config.backoff_cooldown()).await;
            period = self.inner.config.backoff_interval();
            if !self.resume_after_backoff(id, period) {
                return;
            }
        }
    }

    async fn poll_once(&self, id: SessionId) -> TickOutcome {
        let result = self
            .inner
            .client
            .fetch_with_fallback(&self.inner.status_urls)
            .await;
        self.apply(id, result)
    }

    fn apply(&self, id: SessionId, result: Result<Value>) -> TickOutcome {
        let mut state = self.lock();
        let renderer = self.inner.renderer.as_ref();
        let Some(session) = state.session.as_mut().filter(|s| s.id() == id) else {
            debug!("Discarding status result for stale session {id}");
            return TickOutcome::Finished;
        };

        let value = match result {
            Ok(value) => value,
            Err(error) => {
                let not_found = error.saw_status(404);
                return self.handle_failure(session, &error.to_string(), not_found);
            }
        };

        session.record_success();
        let completed = match StatusOutcome::classify(value) {
            StatusOutcome::NoPlan { message } => {
                let entry = LogEntry::info(format!("{message}, please send a query first"));
                emit_log(renderer, Some(session), entry);
                false
            }
            StatusOutcome::ServerError { message } => {
                let entry = LogEntry::error(format!("Server error: {message}"));
                emit_log(renderer, Some(session), entry);
                false
            }
            StatusOutcome::Unexpected { reason } => {
                let entry = LogEntry::error(format!("Unexpected status payload: {reason}"));
                emit_log(renderer, Some(session), entry);
                false
            }
            StatusOutcome::Missing => {
                return self.handle_failure(session, NO_DATA_MESSAGE, false);
            }
            StatusOutcome::Update(response) => {
                session.plan_mut().merge(&response);
                renderer.render_status(&StatusView::from_plan(session.plan()));
                let logs = response.logs.unwrap_or_default();
                for entry in logs.into_iter().filter(|e| !e.message.trim().is_empty()) {
                    emit_log(renderer, Some(&mut *session), entry);
                }
                if session.plan().is_completed() {
                    emit_log(renderer, Some(session), LogEntry::info(COMPLETED_MESSAGE));
                    true
                } else {
                    false
                }
            }
        };

        if completed {
            info!("Plan completed, stopping session {id}");
            self.stop_locked(&mut state);
            return TickOutcome::Finished;
        }
        TickOutcome::Continue
    }

    fn handle_failure(
        &self,
        session: &mut PollingSession,
        message: &str,
        not_found: bool,
    ) -> TickOutcome {
        let renderer = self.inner.renderer.as_ref();
        warn!("Status check failed: {message}");

        if session.note_error(message) {
            emit_log(renderer, Some(&mut *session), LogEntry::error(message));
        }
        if not_found {
            emit_log(renderer, Some(&mut *session), LogEntry::info(NOT_FOUND_HINT));
        }

        let max_retries = self.inner.config.max_retries;
        if session.record_failure() > max_retries {
            let entry = LogEntry::warn(format!(
                "Reached maximum retries ({max_retries}), reducing status check frequency"
            ));
            emit_log(renderer, Some(session), entry);
            self.set_phase(PollPhase::Backoff);
            return TickOutcome::Backoff;
        }
        TickOutcome::Continue
    }

    fn resume_after_backoff(&self, id: SessionId, interval: Duration) -> bool {
        let mut state = self.lock();
        let Some(session) = state.session.as_mut().filter(|s| s.id() == id) else {
            return false;
        };

        session.reset_retries();
        emit_log(
            self.inner.renderer.as_ref(),
            Some(session),
            LogEntry::info(RESUMING_MESSAGE),
        );
        self.set_phase(PollPhase::Polling { interval });
        debug!("Session {id} resumed polling every {interval:?}");
        true
    }

    fn stop_locked(&self, state: &mut ControllerState) -> bool {
        let Some(timer) = state.timer.take() else {
            return false;
        };
        timer.abort();
        state.session = None;
        self.set_phase(PollPhase::Stopped);

        let renderer = Arc::clone(&self.inner.renderer);
        let delay = self.inner.config.hide_delay();
        let hide_timer = tokio::spawn(async move {
            time::sleep(delay).await;
            renderer.hide_status_panel();
        });
        if let Some(previous) = state.hide_timer.replace(hide_timer) {
            previous.abort();
        }
        true
    }
}

/// Renders `entry` unless the session has already shown the same text.
fn emit_log(renderer: &dyn Renderer, session: Option<&mut PollingSession>, entry: LogEntry) {
    if let Some(session) = session {
        if !session.admit(&entry) {
            return;
        }
    }
    renderer.append_log(&LogLine::stamp(entry));
}
