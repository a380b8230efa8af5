//! Gating configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Gate decision watchdog configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatingConfig {
    /// Watchdog deadline for one gate activation, in milliseconds
    #[serde(default = "default_decision_timeout_ms")]
    pub decision_timeout_ms: u64,
}

impl GatingConfig {
    /// The deadline as a `Duration`
    pub fn decision_timeout(&self) -> Duration {
        Duration::from_millis(self.decision_timeout_ms)
    }

    /// Validate gating configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.decision_timeout_ms == 0 || self.decision_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidDecisionTimeout);
        }
        Ok(())
    }
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            decision_timeout_ms: default_decision_timeout_ms(),
        }
    }
}

fn default_decision_timeout_ms() -> u64 {
    3000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_three_seconds() {
        let config = GatingConfig::default();
        assert_eq!(config.decision_timeout(), Duration::from_millis(3000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_and_oversized_timeouts_are_rejected() {
        assert!(GatingConfig { decision_timeout_ms: 0 }.validate().is_err());
        assert!(GatingConfig { decision_timeout_ms: 120_000 }.validate().is_err());
    }
}
