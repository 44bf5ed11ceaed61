use super::traits::{invalid, ConfigSection};
use crate::error::FoldError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub exchange_rounds: usize,
    pub migrant_fraction: f64,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            exchange_rounds: 5,
            migrant_fraction: 0.2,
        }
    }
}

impl MigrationConfig {
    /// Individuals sent to the next neighbour per exchange round
    pub fn migrants_per_exchange(&self, population_size: usize) -> usize {
        (population_size as f64 * self.migrant_fraction).floor() as usize
    }
}

impl ConfigSection for MigrationConfig {
    fn section_name() -> &'static str {
        "migration"
    }

    fn validate(&self) -> Result<(), FoldError> {
        if self.exchange_rounds == 0 {
            return Err(invalid::<Self>("At least one exchange round is required"));
        }
        if !(0.0..=1.0).contains(&self.migrant_fraction) {
            return Err(invalid::<Self>("Migrant fraction must be between 0 and 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sends_a_fifth() {
        let config = MigrationConfig::default();
        assert_eq!(config.migrants_per_exchange(2500), 500);
        assert_eq!(config.migrants_per_exchange(50), 10);
        assert_eq!(config.migrants_per_exchange(4), 0);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let config = MigrationConfig {
            exchange_rounds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
