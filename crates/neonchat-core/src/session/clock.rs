use std::fmt::Write;

use crate::DEFAULT_TIME_FORMAT;

/// Source of message timestamps
pub trait Clock {
    /// Current local time rendered with a chrono format string
    fn now(&self, format: &str) -> String;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self, format: &str) -> String {
        let now = chrono::Local::now();
        let mut label = String::new();
        if write!(label, "{}", now.format(format)).is_err() {
            return now.format(DEFAULT_TIME_FORMAT).to_string();
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_hour_minute() {
        let label = LocalClock.now(DEFAULT_TIME_FORMAT);
        assert_eq!(label.len(), 5);
        assert_eq!(label.as_bytes()[2], b':');
    }

    #[test]
    fn test_bad_format_falls_back() {
        let label = LocalClock.now("%Q");
        assert_eq!(label.len(), 5);
    }
}
