//! Per-call deadlines for decision-maker invocations.
//!
//! Every call out to a decision maker carries an explicit `Deadline`.
//! The engine checks it after the call returns: a response that arrives
//! past the deadline is discarded and treated exactly like a fault or a
//! malformed payload.

use std::time::{Duration, Instant};

/// A point in time by which a decision must have been produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// The standard ceiling for a single decision-maker call.
    pub const STANDARD_TIMEOUT: Duration = Duration::from_secs(5);

    /// A deadline the given duration from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// A deadline with the standard timeout.
    #[must_use]
    pub fn standard() -> Self {
        Self::after(Self::STANDARD_TIMEOUT)
    }

    /// A deadline that has already passed. Useful for testing the
    /// late-response path.
    #[must_use]
    pub fn already_expired() -> Self {
        Self {
            at: Instant::now() - Duration::from_secs(1),
        }
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Time left before the deadline, zero if it has passed.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}
