pub mod collector;
pub mod executor;
pub mod migration;
pub mod statistics;
pub mod topology;
pub mod transport;

pub use collector::collect_champion;
pub use executor::{execute_rank, run_local, RankOutcome};
pub use migration::{exchange_with_neighbors, MigrationProtocol};
pub use statistics::reduce_generation_count;
pub use topology::{RingTopology, ROOT};
pub use transport::{LocalCluster, LocalEndpoint, Transport};
