use super::{
    cluster::ClusterConfig,
    evolution::{EvolutionConfig, StoppingMode},
    migration::MigrationConfig,
    traits::ConfigSection,
};
use crate::error::FoldError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `HPFOLD__EVOLUTION__POPULATION_SIZE`
pub const ENV_PREFIX: &str = "HPFOLD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub migration: MigrationConfig,
    pub cluster: ClusterConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), FoldError> {
        self.evolution.validate()?;
        self.migration.validate()?;
        self.cluster.validate()?;

        let rounds = self.migration.exchange_rounds as u64;
        match self.evolution.stopping_mode {
            StoppingMode::GenerationLimit if self.evolution.generation_limit < rounds => {
                return Err(FoldError::Configuration(format!(
                    "Generation limit {} leaves no generations for {} exchange rounds",
                    self.evolution.generation_limit, rounds
                )));
            }
            StoppingMode::TimeLimit if self.evolution.time_limit_ms < rounds => {
                return Err(FoldError::Configuration(format!(
                    "Time limit {} ms leaves no time for {} exchange rounds",
                    self.evolution.time_limit_ms, rounds
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// Layer defaults, a TOML/JSON file and `HPFOLD__` environment variables
    pub fn from_sources<P: AsRef<Path>>(path: Option<P>) -> Result<Self, FoldError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()).required(true));
        }
        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FoldError> {
        let config = AppConfig::from_sources(Some(path))?;
        *self.write()? = config;
        Ok(())
    }

    /// Apply only environment overrides on top of the defaults
    pub fn load_from_env(&self) -> Result<(), FoldError> {
        let config = AppConfig::from_sources(None::<&Path>)?;
        *self.write()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FoldError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| FoldError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| FoldError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, FoldError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| FoldError::Configuration("Config lock poisoned".to_string()))
    }

    pub fn update<F>(&self, f: F) -> Result<(), FoldError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.write()?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, FoldError> {
        self.config
            .write()
            .map_err(|_| FoldError::Configuration("Config lock poisoned".to_string()))
    }
}
