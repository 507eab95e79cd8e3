use std::time::Duration;

/// Cycle durations and the long-break cadence.
///
/// Immutable for the lifetime of a timer; every phase reads its own duration
/// from here. Values are not validated -- a zero duration exhausts on the
/// first tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub work: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
    /// Number of completed work sessions between long breaks.
    pub sessions_before_long_break: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work: Duration::from_secs(25 * 60),
            short_break: Duration::from_secs(5 * 60),
            long_break: Duration::from_secs(15 * 60),
            sessions_before_long_break: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations() {
        let config = TimerConfig::default();
        assert_eq!(config.work, Duration::from_secs(25 * 60));
        assert_eq!(config.short_break, Duration::from_secs(5 * 60));
        assert_eq!(config.long_break, Duration::from_secs(15 * 60));
        assert_eq!(config.sessions_before_long_break, 4);
    }
}
