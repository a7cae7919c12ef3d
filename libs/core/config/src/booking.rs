use crate::{env_or_default, ConfigError, FromEnv};
use std::time::Duration;

/// Compensation policy for the booking orchestrator.
///
/// When a step of the purchase sequence fails after a seat was already
/// reserved, the orchestrator must give the seat back. That release is
/// retried `attempts` times with exponential backoff starting at `backoff`
/// before the failure is escalated as an inventory invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingConfig {
    /// Maximum number of attempts for a compensating seat release
    pub compensation_attempts: u32,
    /// Initial backoff between attempts (doubled each retry)
    pub compensation_backoff: Duration,
}

impl BookingConfig {
    pub fn new(compensation_attempts: u32, compensation_backoff: Duration) -> Self {
        Self {
            compensation_attempts,
            compensation_backoff,
        }
    }
}

impl FromEnv for BookingConfig {
    /// Reads from environment variables with sensible defaults:
    /// - BOOKING_COMPENSATION_ATTEMPTS: defaults to 3
    /// - BOOKING_COMPENSATION_BACKOFF_MS: defaults to 50
    fn from_env() -> Result<Self, ConfigError> {
        let attempts = env_or_default("BOOKING_COMPENSATION_ATTEMPTS", "3")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "BOOKING_COMPENSATION_ATTEMPTS".to_string(),
                details: format!("{}", e),
            })?;

        let backoff_ms: u64 = env_or_default("BOOKING_COMPENSATION_BACKOFF_MS", "50")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "BOOKING_COMPENSATION_BACKOFF_MS".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            compensation_attempts: attempts,
            compensation_backoff: Duration::from_millis(backoff_ms),
        })
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            compensation_attempts: 3,
            compensation_backoff: Duration::from_millis(50),
        }
    }
}
