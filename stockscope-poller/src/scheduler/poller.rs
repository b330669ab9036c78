//! Result poller
//!
//! Polls the analysis backend for one job at a time until the result is
//! ready, the attempt budget runs out, checks keep failing, or the caller
//! cancels. Each `start` gets a new generation number; a timer task that
//! wakes up under an older generation exits without checking, which is what
//! makes cancel-then-restart safe against a timer that already fired.

use std::sync::{Arc, Mutex};

use stockscope_core::StatusCheck;
use stockscope_core::domain::check::CheckResult;
use stockscope_core::domain::poll::{PollEvent, PollOutcome, PollState, PollStatus, TickResult};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::PollConfig;
use crate::error::PollError;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Polls for the result of one analysis job at a time
pub struct ResultPoller {
    checker: Arc<dyn StatusCheck>,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<PollEvent>,
}

struct Inner {
    state: PollState,
    generation: u64,
    task: Option<JoinHandle<()>>,
    /// A check was dispatched and has not returned yet
    in_flight: bool,
}

/// What a single check did to the poll state
enum Step {
    Continue(PollEvent),
    Finish(Option<PollEvent>, PollOutcome),
}

impl ResultPoller {
    /// Creates an idle poller that checks results through `checker`
    pub fn new(checker: Arc<dyn StatusCheck>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            checker,
            inner: Arc::new(Mutex::new(Inner {
                state: PollState::default(),
                generation: 0,
                task: None,
                in_flight: false,
            })),
            events,
        }
    }

    /// Subscribes to progress ticks and terminal outcomes
    ///
    /// Subscribe before calling [`start`](Self::start) to be sure not to miss
    /// the outcome of a fast job.
    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.events.subscribe()
    }

    /// Current status
    pub fn status(&self) -> PollStatus {
        self.inner.lock().unwrap().state.status
    }

    /// Snapshot of the current poll state
    pub fn state(&self) -> PollState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Starts polling for `job_id`
    ///
    /// Any job that is still polling is cancelled first. The first check
    /// happens after one full interval, never immediately, so the backend has
    /// time to pick the job up.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, job_id: impl Into<String>, config: PollConfig) -> Result<(), PollError> {
        let job_id = job_id.into();
        if job_id.trim().is_empty() {
            return Err(PollError::EmptyJobId);
        }
        config.validate()?;

        let mut inner = self.inner.lock().unwrap();
        self.cancel_locked(&mut inner);

        inner.generation += 1;
        inner.state = PollState::polling(job_id.clone());
        inner.in_flight = false;

        info!(
            "Polling for job {} (interval: {:?}, max attempts: {}, max failures: {})",
            job_id, config.interval, config.max_attempts, config.max_consecutive_failures
        );

        let task = tokio::spawn(run_poll_loop(
            Arc::clone(&self.checker),
            Arc::clone(&self.inner),
            self.events.clone(),
            job_id,
            config,
            inner.generation,
        ));
        inner.task = Some(task);

        Ok(())
    }

    /// Cancels the active poll
    ///
    /// Takes effect before returning: a pending timer is dropped and the
    /// status is `cancelled`. A check that is already in flight is left to
    /// finish, but its result is discarded. Does nothing when no job is
    /// polling.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock().unwrap();
        self.cancel_locked(&mut inner);
    }

    /// Performs one manual check, outside the timer loop
    ///
    /// Neither the attempt budget nor the failure count is touched, and the
    /// timer schedule of an active poll is unchanged.
    pub async fn check_once(&self, job_id: &str) -> CheckResult {
        debug!("Manual result check for job {}", job_id);
        self.checker.check(job_id).await
    }

    fn cancel_locked(&self, inner: &mut Inner) {
        if inner.state.status != PollStatus::Polling {
            return;
        }

        let job_id = inner.state.job_id.take().unwrap_or_default();
        inner.generation += 1;

        if let Some(task) = inner.task.take() {
            // An in-flight check runs to completion; the generation guard drops its result
            if !inner.in_flight {
                task.abort();
            }
        }
        inner.in_flight = false;
        inner.state = PollState::cleared(PollStatus::Cancelled);

        info!("Polling for job {} cancelled", job_id);
        let _ = self
            .events
            .send(PollEvent::Finished(PollOutcome::Cancelled { job_id }));
    }
}

impl Drop for ResultPoller {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.generation += 1;
            if let Some(task) = inner.task.take() {
                task.abort();
            }
        }
    }
}

impl std::fmt::Debug for ResultPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultPoller")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Timer loop for one generation of one job
async fn run_poll_loop(
    checker: Arc<dyn StatusCheck>,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<PollEvent>,
    job_id: String,
    config: PollConfig,
    generation: u64,
) {
    loop {
        time::sleep(config.interval).await;

        {
            let mut guard = inner.lock().unwrap();
            if !is_current(&guard, generation) {
                debug!("Stale timer for job {} ignored", job_id);
                return;
            }
            guard.in_flight = true;
        }

        debug!("Checking result for job {}", job_id);
        let result = checker.check(&job_id).await;

        let mut guard = inner.lock().unwrap();
        if !is_current(&guard, generation) {
            debug!("Discarding result for job {} after cancellation", job_id);
            return;
        }
        guard.in_flight = false;

        match advance(&mut guard.state, &job_id, result, &config) {
            Step::Continue(tick) => {
                let _ = events.send(tick);
            }
            Step::Finish(tick, outcome) => {
                guard.task = None;
                guard.state.job_id = None;
                if let Some(tick) = tick {
                    let _ = events.send(tick);
                }
                report_outcome(&outcome);
                let _ = events.send(PollEvent::Finished(outcome));
                return;
            }
        }
    }
}

fn is_current(inner: &Inner, generation: u64) -> bool {
    inner.generation == generation && inner.state.status == PollStatus::Polling
}

/// Applies one check result to the poll state
fn advance(state: &mut PollState, job_id: &str, result: CheckResult, config: &PollConfig) -> Step {
    match result {
        CheckResult::Ready(payload) => {
            state.consecutive_failure_count = 0;
            state.status = PollStatus::Succeeded;
            Step::Finish(
                None,
                PollOutcome::Succeeded {
                    job_id: job_id.to_string(),
                    payload,
                },
            )
        }
        CheckResult::NotReady => {
            state.attempt_count += 1;
            state.consecutive_failure_count = 0;
            let tick = tick(state, job_id, TickResult::NotReady);

            if state.attempt_count >= config.max_attempts {
                state.status = PollStatus::TimedOut;
                Step::Finish(
                    Some(tick),
                    PollOutcome::TimedOut {
                        job_id: job_id.to_string(),
                        attempts: state.attempt_count,
                    },
                )
            } else {
                Step::Continue(tick)
            }
        }
        CheckResult::Error(reason) => {
            state.consecutive_failure_count += 1;
            warn!(
                "Result check for job {} failed ({}/{}): {}",
                job_id, state.consecutive_failure_count, config.max_consecutive_failures, reason
            );
            let tick = tick(
                state,
                job_id,
                TickResult::Error {
                    reason: reason.clone(),
                },
            );

            if state.consecutive_failure_count >= config.max_consecutive_failures {
                state.status = PollStatus::Failed;
                Step::Finish(
                    Some(tick),
                    PollOutcome::Failed {
                        job_id: job_id.to_string(),
                        reason,
                    },
                )
            } else {
                Step::Continue(tick)
            }
        }
    }
}

fn tick(state: &PollState, job_id: &str, result: TickResult) -> PollEvent {
    PollEvent::Tick {
        job_id: job_id.to_string(),
        attempt: state.attempt_count,
        consecutive_failures: state.consecutive_failure_count,
        result,
    }
}

fn report_outcome(outcome: &PollOutcome) {
    match outcome {
        PollOutcome::Succeeded { job_id, .. } => info!("Result ready for job {}", job_id),
        PollOutcome::TimedOut { job_id, attempts } => {
            info!("Gave up on job {} after {} attempt(s)", job_id, attempts)
        }
        PollOutcome::Failed { job_id, reason } => {
            warn!("Stopped polling job {}: {}", job_id, reason)
        }
        PollOutcome::Cancelled { job_id } => info!("Polling for job {} cancelled", job_id),
    }
}
