//! Elapsed-time scoring and the injected clock.
//!
//! The drawing game awards points that decay with the round clock. Services
//! read time from a [`Clock`] they hold, so tests can pin "now" and assert
//! exact points and timestamps.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a settable instant, for tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock pinned at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Advances the clock by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Seconds elapsed between two instants, clamped at zero.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - start).num_milliseconds();
    (millis.max(0) as f64) / 1000.0
}

/// Points for a correct guess `elapsed` seconds into a round of
/// `round_duration` seconds.
///
/// `round(100 + 50 * max(0, (duration - elapsed) / duration))`: 150 at the
/// instant the round starts, decaying linearly to 100 as the clock expires,
/// and never below 100 for late guesses.
pub fn guess_points(round_duration: u32, elapsed: f64) -> u32 {
    let duration = round_duration as f64;
    let remaining = ((duration - elapsed) / duration).max(0.0);
    (100.0 + 50.0 * remaining).round() as u32
}
