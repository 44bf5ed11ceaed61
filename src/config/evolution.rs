use super::traits::{invalid, ConfigSection};
use crate::engines::evaluation::resolve_sequence;
use crate::error::FoldError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub selection_method: SelectionMethod,
    pub tournament_size: usize,
    pub stopping_mode: StoppingMode,
    pub generation_limit: u64,
    pub time_limit_ms: u64,
    pub primary_sequence: String,
    pub calc_hamming_distance: bool,
    pub documents_statistic: bool,
    pub print_while_generating: bool,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMethod {
    FitnessProportional,
    TournamentProportional,
    TournamentBest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoppingMode {
    GenerationLimit,
    TimeLimit,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 2500,
            mutation_rate: 0.02,
            crossover_rate: 0.25,
            selection_method: SelectionMethod::FitnessProportional,
            tournament_size: 200,
            stopping_mode: StoppingMode::GenerationLimit,
            generation_limit: 163,
            time_limit_ms: 10_000,
            primary_sequence: "SEQ48".to_string(),
            calc_hamming_distance: false,
            documents_statistic: true,
            print_while_generating: false,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Moves per individual for the configured primary sequence
    pub fn genome_length(&self) -> Result<usize, FoldError> {
        let sequence = resolve_sequence(&self.primary_sequence)?;
        Ok(sequence.len() - 1)
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), FoldError> {
        if self.population_size == 0 {
            return Err(invalid::<Self>("Population size must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid::<Self>("Mutation rate must be between 0 and 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(invalid::<Self>("Crossover rate must be between 0 and 1"));
        }
        if self.tournament_size == 0 {
            return Err(invalid::<Self>("Tournament size must be at least 1"));
        }
        match self.stopping_mode {
            StoppingMode::GenerationLimit if self.generation_limit == 0 => {
                return Err(invalid::<Self>("Generation limit must be positive"));
            }
            StoppingMode::TimeLimit if self.time_limit_ms == 0 => {
                return Err(invalid::<Self>("Time limit must be positive"));
            }
            _ => {}
        }
        resolve_sequence(&self.primary_sequence)?;
        Ok(())
    }
}
