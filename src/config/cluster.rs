use super::traits::{invalid, ConfigSection};
use crate::error::FoldError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the in-process cluster that hosts the ranks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub ranks: usize,
    /// Bounds every blocking send and receive; unset waits forever
    pub message_timeout_ms: Option<u64>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            ranks: 4,
            message_timeout_ms: None,
        }
    }
}

impl ClusterConfig {
    pub fn message_timeout(&self) -> Option<Duration> {
        self.message_timeout_ms.map(Duration::from_millis)
    }
}

impl ConfigSection for ClusterConfig {
    fn section_name() -> &'static str {
        "cluster"
    }

    fn validate(&self) -> Result<(), FoldError> {
        if self.ranks == 0 {
            return Err(invalid::<Self>("At least one rank is required"));
        }
        if self.message_timeout_ms == Some(0) {
            return Err(invalid::<Self>("Message timeout must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_timeout_applies_as_duration() {
        let config = ClusterConfig {
            message_timeout_ms: Some(250),
            ..Default::default()
        };
        assert_eq!(config.message_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(ClusterConfig::default().message_timeout(), None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ClusterConfig {
            message_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
