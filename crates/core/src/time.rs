use chrono::{DateTime, Duration, Utc};

/// Clock abstraction so services and tests agree on "now".
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Clock that follows system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Clock pinned at `at`.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Current time according to this clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Advance a fixed clock by `delta`; no effect on a system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests (2025-04-30T07:20:00Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_746_000_000;

/// Deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(FIXED_TEST_TIMESTAMP, 0).expect("fixed timestamp should be valid")
}
