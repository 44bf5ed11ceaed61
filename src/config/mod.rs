pub mod traits;
pub mod evolution;
pub mod migration;
pub mod cluster;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, SelectionMethod, StoppingMode};
pub use migration::MigrationConfig;
pub use cluster::ClusterConfig;
