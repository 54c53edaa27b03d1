//! Exam timer driven by the tokio runtime

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};
use tokio::{
    runtime::Handle,
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Duration, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use super::{Countdown, ObserverId, TickOutcome, TimerError};
use crate::{
    alerts::{AlertKind, AlertOptions, AlertSink},
    state::TimerState,
};

/// Interval between two countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Message published to the alert sink when an attempt runs out of time
pub const TIME_UP_MESSAGE: &str = "Time is up! The exam will be submitted automatically.";

/// Terminal notification fired when the countdown reaches zero
pub type ExpiryHandler = Box<dyn FnOnce() + Send>;

struct Inner {
    countdown: Countdown,
    ticker: Option<JoinHandle<()>>,
    /// Bumped on every start; a tick task only acts for its own generation
    generation: u64,
    /// When the countdown last stopped ticking, `None` while running
    idle_since: Option<Instant>,
    on_expire: Option<ExpiryHandler>,
    alert_sink: Option<Arc<dyn AlertSink>>,
}

struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<TimerState>,
}

/// Countdown timer for a single exam attempt.
///
/// Cloning yields another handle to the same countdown. Observers run on the
/// tick task while the timer is locked, so they must not call back into the
/// same timer. The expiry notifications run after the lock is released.
#[derive(Clone)]
pub struct ExamTimer {
    shared: Arc<Shared>,
}

impl ExamTimer {
    /// Create a stopped timer of `duration_minutes`
    pub fn new(duration_minutes: u64) -> Result<Self, TimerError> {
        let countdown = Countdown::from_minutes(duration_minutes)?;
        let (state_tx, _) = watch::channel(countdown.state());

        Ok(Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    countdown,
                    ticker: None,
                    generation: 0,
                    idle_since: Some(Instant::now()),
                    on_expire: None,
                    alert_sink: None,
                }),
                state_tx,
            }),
        })
    }

    /// Create a stopped timer that reports expiry to `sink`
    pub fn with_alert_sink(duration_minutes: u64, sink: Arc<dyn AlertSink>) -> Result<Self, TimerError> {
        let timer = Self::new(duration_minutes)?;
        timer.shared.lock().alert_sink = Some(sink);
        Ok(timer)
    }

    /// Begin ticking once per second. Calling this while running, or after
    /// the countdown has expired, does nothing.
    pub fn start(&self) -> Result<(), TimerError> {
        let runtime = Handle::try_current().map_err(|_| TimerError::RuntimeUnavailable)?;
        let mut inner = self.shared.lock();

        if !inner.countdown.start() {
            debug!(
                running = inner.countdown.is_running(),
                remaining = inner.countdown.remaining_seconds(),
                "Timer start ignored"
            );
            return Ok(());
        }

        inner.generation += 1;
        inner.idle_since = None;
        let shared = Arc::downgrade(&self.shared);
        inner.ticker = Some(runtime.spawn(run_ticker(shared, inner.generation)));
        info!(
            remaining = inner.countdown.remaining_seconds(),
            generation = inner.generation,
            "Exam timer started"
        );
        self.shared.publish(&inner);
        Ok(())
    }

    /// Halt ticking without firing the expiry notifications.
    ///
    /// The tick task is released before this returns; no observer is
    /// notified afterwards.
    pub fn stop(&self) {
        let mut inner = self.shared.lock();
        if !inner.countdown.stop() {
            debug!("Timer stop ignored, not running");
            return;
        }

        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        inner.idle_since = Some(Instant::now());
        info!(
            remaining = inner.countdown.remaining_seconds(),
            "Exam timer stopped"
        );
        self.shared.publish(&inner);
    }

    /// Register a callback invoked with the remaining seconds on every tick
    pub fn add_observer<F>(&self, observer: F) -> ObserverId
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.shared.lock().countdown.add_observer(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.shared.lock().countdown.remove_observer(id)
    }

    /// Replace the handler fired once when the countdown reaches zero.
    /// It runs after the alert sink, if one is set.
    pub fn on_expire<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.lock().on_expire = Some(Box::new(handler));
    }

    /// Watch the timer state; a new value is published on every change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.state_tx.subscribe()
    }

    pub fn state(&self) -> TimerState {
        self.shared.lock().countdown.state()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.shared.lock().countdown.remaining_seconds()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().countdown.is_running()
    }

    /// How long the timer has not been ticking, `None` while running
    pub fn idle_for(&self) -> Option<Duration> {
        self.shared.lock().idle_since.map(|since| since.elapsed())
    }

    /// Whether a tick task is currently scheduled
    pub fn has_tick_source(&self) -> bool {
        self.shared
            .lock()
            .ticker
            .as_ref()
            .is_some_and(|ticker| !ticker.is_finished())
    }
}

impl std::fmt::Debug for ExamTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExamTimer")
            .field("state", &self.state())
            .finish()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.state_tx.send_replace(inner.countdown.state());
    }

    /// Process one tick for the task started at `generation`.
    /// Returns `false` once that task should exit.
    fn tick(&self, generation: u64) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(generation, current = inner.generation, "Superseded tick task exiting");
            return false;
        }
        if !inner.countdown.is_running() {
            return false;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| inner.countdown.tick()));
        match outcome {
            Ok(TickOutcome::Ticked { .. }) => {
                self.publish(&inner);
                true
            }
            Ok(TickOutcome::Expired) => {
                // the task is exiting on its own, drop the handle without aborting
                inner.ticker = None;
                inner.idle_since = Some(Instant::now());
                let handler = inner.on_expire.take();
                let sink = inner.alert_sink.clone();
                self.publish(&inner);
                drop(inner);

                if let Some(sink) = &sink {
                    sink.show(TIME_UP_MESSAGE, AlertKind::Warning, AlertOptions::default());
                }
                match handler {
                    Some(handler) => handler(),
                    None if sink.is_none() => warn!("{}", TIME_UP_MESSAGE),
                    None => {}
                }
                false
            }
            Ok(TickOutcome::Idle) => false,
            Err(_) => {
                error!(
                    remaining = inner.countdown.remaining_seconds(),
                    "Timer observer panicked, halting countdown"
                );
                inner.countdown.stop();
                inner.ticker = None;
                inner.idle_since = Some(Instant::now());
                self.publish(&inner);
                false
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
    }
}

async fn run_ticker(shared: Weak<Shared>, generation: u64) {
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            debug!("Timer dropped, tick task exiting");
            break;
        };
        if !shared.tick(generation) {
            break;
        }
    }
}
