use crate::config::SelectionMethod;
use crate::engines::generation::population::{cmp_fitness, Population};
use crate::error::{FoldError, Result};
use crate::types::{Genepool, Structure};
use rand::seq::index;
use rand::Rng;

/// How parents are drawn from a scored population.
///
/// Every variant returns a genepool with as many members as the population
/// and leaves the population itself untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Roulette wheel over the whole population
    FitnessProportional,
    /// Roulette wheel inside a random candidate subset
    TournamentProportional { candidates: usize },
    /// Fittest member of a random candidate subset
    TournamentBest { candidates: usize },
}

impl SelectionStrategy {
    pub fn from_config(method: SelectionMethod, tournament_size: usize) -> Self {
        match method {
            SelectionMethod::FitnessProportional => SelectionStrategy::FitnessProportional,
            SelectionMethod::TournamentProportional => SelectionStrategy::TournamentProportional {
                candidates: tournament_size,
            },
            SelectionMethod::TournamentBest => SelectionStrategy::TournamentBest {
                candidates: tournament_size,
            },
        }
    }

    pub fn select<R: Rng + ?Sized>(&self, population: &Population, rng: &mut R) -> Result<Genepool> {
        if !population.is_evaluated() {
            return Err(FoldError::Generation(
                "Selection requires an evaluated population".to_string(),
            ));
        }

        let structures = population.structures();
        let n = structures.len();

        let selection = match *self {
            SelectionStrategy::FitnessProportional => {
                let wheel = RouletteWheel::new(structures.iter());
                (0..n)
                    .map(|_| structures[wheel.spin(rng)].individual().clone())
                    .collect()
            }
            SelectionStrategy::TournamentProportional { candidates } => (0..n)
                .map(|_| {
                    let subset = draw_candidates(n, candidates, rng);
                    let wheel = RouletteWheel::new(subset.iter().map(|&i| &structures[i]));
                    structures[subset[wheel.spin(rng)]].individual().clone()
                })
                .collect(),
            SelectionStrategy::TournamentBest { candidates } => (0..n)
                .map(|_| {
                    let subset = draw_candidates(n, candidates, rng);
                    let winner = subset
                        .iter()
                        .copied()
                        .max_by(|&a, &b| cmp_fitness(structures[a].fitness(), structures[b].fitness()))
                        .unwrap_or(subset[0]);
                    structures[winner].individual().clone()
                })
                .collect(),
        };
        Ok(selection)
    }
}

/// Distinct indices drawn uniformly from `0..n`
fn draw_candidates<R: Rng + ?Sized>(n: usize, candidates: usize, rng: &mut R) -> Vec<usize> {
    index::sample(rng, n, candidates.clamp(1, n)).into_vec()
}

/// Cumulative absolute fitness over a slice of structures
struct RouletteWheel {
    cumulative: Vec<f64>,
    total: f64,
}

impl RouletteWheel {
    fn new<'a>(structures: impl Iterator<Item = &'a Structure>) -> Self {
        let mut total = 0.0;
        let cumulative = structures
            .map(|s| {
                let weight = s.fitness().abs();
                if weight.is_finite() {
                    total += weight;
                }
                total
            })
            .collect();
        Self { cumulative, total }
    }

    /// Index of the first entry whose cumulative weight exceeds a uniform
    /// draw in `[0, total)`. Falls back to a uniform pick without weight.
    fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let n = self.cumulative.len();
        if self.total <= 0.0 || !self.total.is_finite() {
            return rng.gen_range(0..n);
        }
        let draw = rng.gen::<f64>() * self.total;
        self.cumulative
            .partition_point(|&c| c <= draw)
            .min(n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Individual, Move};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn structure(fitness: f64) -> Structure {
        Structure::new(Individual::new(vec![Move::Left]), 0, 0, fitness)
    }

    #[test]
    fn test_wheel_walks_cumulative_weights() {
        let structures = [structure(1.0), structure(0.0), structure(3.0)];
        let wheel = RouletteWheel::new(structures.iter());
        assert_eq!(wheel.cumulative, vec![1.0, 1.0, 4.0]);

        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..500 {
            assert_ne!(wheel.spin(&mut rng), 1, "zero-weight entry was drawn");
        }
    }

    #[test]
    fn test_zero_total_falls_back_to_uniform() {
        let structures = [structure(0.0), structure(0.0), structure(0.0)];
        let wheel = RouletteWheel::new(structures.iter());
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[wheel.spin(&mut rng)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_candidates_are_distinct_and_clamped() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut subset = draw_candidates(5, 200, &mut rng);
        assert_eq!(subset.len(), 5);
        subset.sort_unstable();
        assert_eq!(subset, vec![0, 1, 2, 3, 4]);
    }
}
