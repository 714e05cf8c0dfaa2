//! Reconnection backoff for the event stream

use std::time::Duration;

/// Exponential backoff with a cap
///
/// Attempts are unlimited; the delay resets once a connection opens.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Delay before the first reconnection attempt
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure
    pub multiplier: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl ReconnectPolicy {
    /// Delay following `current`, clamped to `max_delay`
    pub fn next_delay(&self, current: Duration) -> Duration {
        let next_ms = (current.as_millis() as f64 * self.multiplier) as u64;
        Duration::from_millis(next_ms).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_sequence() {
        let policy = ReconnectPolicy::default();
        let mut delay = policy.initial_delay;
        let expected = [500, 1_000, 2_000, 4_000, 8_000, 16_000, 30_000, 30_000];

        for &expected_ms in &expected {
            assert_eq!(delay.as_millis() as u64, expected_ms);
            delay = policy.next_delay(delay);
        }
    }

    #[test]
    fn test_custom_multiplier_clamps() {
        let policy = ReconnectPolicy {
            multiplier: 3.0,
            max_delay: Duration::from_secs(5),
            ..Default::default()
        };
        assert_eq!(policy.next_delay(Duration::from_secs(1)), Duration::from_secs(3));
        assert_eq!(policy.next_delay(Duration::from_secs(3)), Duration::from_secs(5));
    }
}
