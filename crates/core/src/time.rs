use chrono::{DateTime, SubsecRound, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
///
/// Timestamps are truncated to whole milliseconds, the precision of the
/// persisted snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at.trunc_subsecs(3))
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now().trunc_subsecs(3),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fixed_clock_truncates_to_millis() {
        let at = fixed_now() + Duration::nanoseconds(1_234_567);
        let clock = Clock::fixed(at);
        assert_eq!(clock.now().timestamp_subsec_nanos(), 1_000_000);
    }

    #[test]
    fn default_clock_has_millisecond_precision() {
        let now = Clock::default_clock().now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
