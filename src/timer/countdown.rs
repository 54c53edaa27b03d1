//! Countdown state machine
//!
//! Pure, runtime-free core of the exam timer. Something else has to call
//! [`Countdown::tick`] once per second; see [`super::ExamTimer`] for the
//! tokio driver.

use tracing::trace;

use super::TimerError;
use crate::state::TimerState;

/// Callback invoked with the remaining seconds after every tick
pub type Observer = Box<dyn FnMut(u64) + Send>;

/// Handle returned by [`Countdown::add_observer`]
pub type ObserverId = u64;

/// Result of processing a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running, nothing changed
    Idle,
    /// One second was consumed and observers were notified
    Ticked { remaining_seconds: u64 },
    /// The last second was consumed; the countdown stopped itself
    Expired,
}

pub struct Countdown {
    total_seconds: u64,
    remaining_seconds: u64,
    running: bool,
    observers: Vec<(ObserverId, Observer)>,
    next_observer_id: ObserverId,
}

impl Countdown {
    /// Create a stopped countdown of `duration_minutes`
    pub fn from_minutes(duration_minutes: u64) -> Result<Self, TimerError> {
        if duration_minutes == 0 {
            return Err(TimerError::InvalidDuration(duration_minutes));
        }
        let total_seconds = duration_minutes
            .checked_mul(60)
            .ok_or(TimerError::DurationOverflow(duration_minutes))?;

        Ok(Self {
            total_seconds,
            remaining_seconds: total_seconds,
            running: false,
            observers: Vec::new(),
            next_observer_id: 0,
        })
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Mark the countdown as running.
    ///
    /// Returns `false` when it was already running or has nothing left to
    /// count, in which case the call changes nothing.
    pub fn start(&mut self) -> bool {
        if self.running || self.is_expired() {
            return false;
        }
        self.running = true;
        true
    }

    /// Halt the countdown. Returns `false` if it was not running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        was_running
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn add_observer<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(u64) + Send + 'static,
    {
        let id = self.next_observer_id;
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered observer
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Consume one second.
    ///
    /// Decrements the counter by exactly one, notifies every observer with
    /// the new value, then stops the countdown if it reached zero. A panic in
    /// an observer propagates to the caller with the decrement already applied.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        let remaining = self.remaining_seconds;
        trace!(remaining, "countdown tick");

        for (_, observer) in self.observers.iter_mut() {
            observer(remaining);
        }

        if remaining == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked {
                remaining_seconds: remaining,
            }
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> TimerState {
        if self.is_expired() {
            TimerState::expired(self.total_seconds)
        } else if self.running {
            TimerState::active(self.total_seconds, self.remaining_seconds)
        } else {
            TimerState::inactive(self.total_seconds, self.remaining_seconds)
        }
    }
}

impl std::fmt::Debug for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Countdown")
            .field("total_seconds", &self.total_seconds)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("running", &self.running)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<u64>>>, impl FnMut(u64) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |remaining| sink.lock().unwrap().push(remaining))
    }

    #[test]
    fn test_create_converts_minutes_to_seconds() {
        for minutes in [1, 3, 60, 180] {
            let countdown = Countdown::from_minutes(minutes).unwrap();
            assert_eq!(countdown.total_seconds(), minutes * 60);
            assert_eq!(countdown.remaining_seconds(), minutes * 60);
            assert!(!countdown.is_running());
        }
    }

    #[test]
    fn test_create_rejects_zero_duration() {
        assert_eq!(
            Countdown::from_minutes(0).unwrap_err(),
            TimerError::InvalidDuration(0)
        );
    }

    #[test]
    fn test_create_rejects_overflowing_duration() {
        assert_eq!(
            Countdown::from_minutes(u64::MAX).unwrap_err(),
            TimerError::DurationOverflow(u64::MAX)
        );
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut countdown = Countdown::from_minutes(1).unwrap();
        assert!(countdown.start());
        assert!(!countdown.start());
        assert!(countdown.is_running());
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let mut countdown = Countdown::from_minutes(1).unwrap();
        assert!(!countdown.stop());
        assert_eq!(countdown.remaining_seconds(), 60);
    }

    #[test]
    fn test_tick_while_stopped_is_idle() {
        let mut countdown = Countdown::from_minutes(1).unwrap();
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.remaining_seconds(), 60);
    }

    #[test]
    fn test_observers_notified_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut countdown = Countdown::from_minutes(1).unwrap();
        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            countdown.add_observer(move |remaining| order.lock().unwrap().push((label, remaining)));
        }

        countdown.start();
        countdown.tick();

        assert_eq!(
            *order.lock().unwrap(),
            vec![("first", 59), ("second", 59), ("third", 59)]
        );
    }

    #[test]
    fn test_full_countdown_expires_once() {
        let (seen, observer) = recorder();
        let mut countdown = Countdown::from_minutes(1).unwrap();
        countdown.add_observer(observer);
        countdown.start();

        let mut expirations = 0;
        for _ in 0..60 {
            if countdown.tick() == TickOutcome::Expired {
                expirations += 1;
            }
        }

        assert_eq!(expirations, 1);
        assert!(!countdown.is_running());
        assert!(countdown.is_expired());
        let expected: Vec<u64> = (0..60).rev().collect();
        assert_eq!(*seen.lock().unwrap(), expected);

        // no decrements past zero
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert!(!countdown.start());
        assert_eq!(seen.lock().unwrap().len(), 60);
    }

    #[test]
    fn test_stop_mid_countdown_halts_notifications() {
        let (seen, observer) = recorder();
        let mut countdown = Countdown::from_minutes(1).unwrap();
        countdown.add_observer(observer);
        countdown.start();

        for _ in 0..5 {
            countdown.tick();
        }
        assert!(countdown.stop());
        assert_eq!(countdown.tick(), TickOutcome::Idle);

        assert_eq!(*seen.lock().unwrap(), vec![59, 58, 57, 56, 55]);
        assert_eq!(countdown.remaining_seconds(), 55);
        assert!(!countdown.is_expired());
    }

    #[test]
    fn test_remove_observer() {
        let (seen, observer) = recorder();
        let mut countdown = Countdown::from_minutes(1).unwrap();
        let id = countdown.add_observer(observer);
        countdown.start();
        countdown.tick();

        assert!(countdown.remove_observer(id));
        assert!(!countdown.remove_observer(id));
        countdown.tick();

        assert_eq!(*seen.lock().unwrap(), vec![59]);
        assert_eq!(countdown.observer_count(), 0);
    }

    #[test]
    #[should_panic(expected = "observer failure")]
    fn test_observer_panic_propagates() {
        let mut countdown = Countdown::from_minutes(1).unwrap();
        countdown.add_observer(|_| panic!("observer failure"));
        countdown.start();
        countdown.tick();
    }

    #[test]
    fn test_state_snapshots() {
        let mut countdown = Countdown::from_minutes(1).unwrap();
        assert_eq!(countdown.state(), TimerState::inactive(60, 60));
        countdown.start();
        countdown.tick();
        assert_eq!(countdown.state(), TimerState::active(60, 59));
    }
}
