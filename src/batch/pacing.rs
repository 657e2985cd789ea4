use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use super::BatchError;

/// Longest pause accepted, in seconds (one day).
pub const MAX_DELAY_SECS: f64 = 86_400.0;

/// Bounds, in seconds, of the random pause between two probes.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(try_from = "RawDelayRange"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    min: f64,
    max: f64,
}

/// Unchecked wire form; goes through [`DelayRange::new`] on deserialization.
#[cfg(feature = "with-serde")]
#[derive(Deserialize)]
struct RawDelayRange {
    min: f64,
    max: f64,
}

#[cfg(feature = "with-serde")]
impl TryFrom<RawDelayRange> for DelayRange {
    type Error = BatchError;

    fn try_from(raw: RawDelayRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

impl DelayRange {
    pub fn new(min: f64, max: f64) -> Result<Self, BatchError> {
        let invalid = |reason: &str| BatchError::InvalidDelay {
            min,
            max,
            reason: reason.to_string(),
        };
        if !min.is_finite() || !max.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if min < 0.0 {
            return Err(invalid("bounds must not be negative"));
        }
        if min > max {
            return Err(invalid("min is greater than max"));
        }
        if max > MAX_DELAY_SECS {
            return Err(invalid("max exceeds one day"));
        }
        Ok(Self { min, max })
    }

    /// No pause at all; handy for tests and dry runs.
    pub fn none() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Uniform draw in `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let secs = if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        };
        Duration::from_secs_f64(secs)
    }
}

/// Where the batch loop waits between probes.
pub trait Pacer {
    fn pause(&mut self, delay: &DelayRange);
}

/// Sleeps the current thread for a randomly drawn duration.
#[derive(Debug, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: &DelayRange) {
        let wait = delay.sample(&mut rand::thread_rng());
        if wait.is_zero() {
            return;
        }
        debug!("sleeping {:.2}s before next probe", wait.as_secs_f64());
        thread::sleep(wait);
    }
}
