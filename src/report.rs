use crate::error::Result;
use crate::types::{Statistic, Structure};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Quality metrics of one fold, in report form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureSummary {
    pub moves: String,
    pub valid_neighbors: usize,
    pub overlaps: usize,
    pub fitness: f64,
}

impl From<&Structure> for StructureSummary {
    fn from(structure: &Structure) -> Self {
        Self {
            moves: structure.individual().to_string(),
            valid_neighbors: structure.valid_neighbor_count(),
            overlaps: structure.overlap_count(),
            fitness: structure.fitness(),
        }
    }
}

/// Results record produced by root after collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub ranks: usize,
    pub global_generation_count: u64,
    pub global_individual_count: u64,
    pub best: StructureSummary,
    /// Every rank's best after re-scoring, in rank order
    pub candidates: Vec<StructureSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statistics: Vec<Statistic>,
}

impl RunReport {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
