pub mod lattice;

pub use lattice::{resolve_sequence, HpLatticeEvaluator, Residue};

use crate::error::Result;
use crate::types::{Individual, Structure};

/// Scores one fold. Implementations must be deterministic so that
/// candidates from different ranks stay comparable after re-scoring.
pub trait FitnessEvaluator: Send + Sync {
    fn evaluate(&self, individual: &Individual) -> Result<Structure>;
}
