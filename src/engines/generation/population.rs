use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::operators::random_genepool;
use crate::error::Result;
use crate::types::{Genepool, Individual, Statistic, Structure};
use rand::Rng;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Compare two fitness values, treating NaN as less than all other values.
pub fn cmp_fitness(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// One rank's genepool plus the aggregates derived from its last evaluation.
///
/// `structures` is index-aligned with `genepool` right after [`evaluate`] and
/// is cleared whenever the genepool is handed out for mutation, so selection
/// never reads scores of individuals that are no longer there.
///
/// [`evaluate`]: Population::evaluate
#[derive(Debug, Clone, Default)]
pub struct Population {
    genepool: Genepool,
    structures: Vec<Structure>,
    total_absolute_fitness: f64,
    best: Option<Structure>,
    statistics: Vec<Statistic>,
}

impl Population {
    pub fn new(genepool: Genepool) -> Self {
        Self {
            genepool,
            ..Default::default()
        }
    }

    pub fn random<R: Rng + ?Sized>(size: usize, genome_length: usize, rng: &mut R) -> Self {
        Self::new(random_genepool(size, genome_length, rng))
    }

    pub fn len(&self) -> usize {
        self.genepool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genepool.is_empty()
    }

    pub fn genepool(&self) -> &[Individual] {
        &self.genepool
    }

    /// Mutable access to the members; invalidates the last evaluation
    pub fn genepool_mut(&mut self) -> &mut Genepool {
        self.invalidate();
        &mut self.genepool
    }

    pub fn replace_genepool(&mut self, next: Genepool) {
        self.invalidate();
        self.genepool = next;
    }

    pub fn add_individual(&mut self, individual: Individual) {
        self.invalidate();
        self.genepool.push(individual);
    }

    fn invalidate(&mut self) {
        self.structures.clear();
        self.total_absolute_fitness = 0.0;
    }

    /// Score every member and fold the result into the best-ever structure
    pub fn evaluate<E: FitnessEvaluator + ?Sized>(&mut self, evaluator: &E) -> Result<()> {
        let structures = self
            .genepool
            .par_iter()
            .map(|individual| evaluator.evaluate(individual))
            .collect::<Result<Vec<_>>>()?;

        self.total_absolute_fitness = structures.iter().map(|s| s.fitness().abs()).sum();
        self.structures = structures;

        if let Some(candidate) = self.generation_best().cloned() {
            let improves = match &self.best {
                Some(best) => cmp_fitness(candidate.fitness(), best.fitness()) == Ordering::Greater,
                None => true,
            };
            if improves {
                self.best = Some(candidate);
            }
        }
        Ok(())
    }

    pub fn is_evaluated(&self) -> bool {
        !self.genepool.is_empty() && self.structures.len() == self.genepool.len()
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn total_absolute_fitness(&self) -> f64 {
        self.total_absolute_fitness
    }

    /// Best structure seen over the whole run
    pub fn best(&self) -> Option<&Structure> {
        self.best.as_ref()
    }

    /// Best structure of the last evaluation
    pub fn generation_best(&self) -> Option<&Structure> {
        self.structures
            .iter()
            .max_by(|a, b| cmp_fitness(a.fitness(), b.fitness()))
    }

    pub fn statistics(&self) -> &[Statistic] {
        &self.statistics
    }

    /// Append a statistic for the last evaluation
    pub fn record_statistic(&mut self, generation: u64, with_hamming_distance: bool) {
        let Some(best) = self.generation_best() else {
            return;
        };

        let average_fitness = self.structures.iter().map(Structure::fitness).sum::<f64>()
            / self.structures.len() as f64;
        let hamming_distance = with_hamming_distance.then(|| {
            let total: usize = self
                .genepool
                .par_iter()
                .map(|individual| individual.hamming_distance(best.individual()))
                .sum();
            total as f64 / self.genepool.len() as f64
        });

        let statistic = Statistic {
            generation,
            best_fitness: best.fitness(),
            average_fitness,
            best_valid_neighbors: best.valid_neighbor_count(),
            best_overlaps: best.overlap_count(),
            hamming_distance,
        };
        self.statistics.push(statistic);
    }
}
