use crate::config::EvolutionConfig;
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    operators::reproduce,
    population::Population,
    progress::ProgressCallback,
    selection::SelectionStrategy,
    stopping::{Continuation, LoopState, StoppingPolicy},
};
use crate::error::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Initialized,
    Running,
    Stopped,
}

/// Drives one rank's local generations.
///
/// `run` can be called repeatedly on the same population: every call is one
/// burst under the stopping policy, and the generation counter plus the
/// population's statistic history carry over between bursts.
pub struct GeneticAlgorithm {
    config: EvolutionConfig,
    selection: SelectionStrategy,
    stopping: StoppingPolicy,
    rng: StdRng,
    state: EngineState,
    total_generations: u64,
}

impl GeneticAlgorithm {
    pub fn new(config: EvolutionConfig, stopping: StoppingPolicy) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let selection = SelectionStrategy::from_config(config.selection_method, config.tournament_size);

        Self {
            config,
            selection,
            stopping,
            rng,
            state: EngineState::Initialized,
            total_generations: 0,
        }
    }

    /// Reseed, e.g. with a rank-specific offset
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_selection(mut self, selection: SelectionStrategy) -> Self {
        self.selection = selection;
        self
    }

    pub fn generate_start_population(&mut self, genome_length: usize) -> Population {
        Population::random(self.config.population_size, genome_length, &mut self.rng)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn total_generations(&self) -> u64 {
        self.total_generations
    }

    pub fn stopping(&self) -> StoppingPolicy {
        self.stopping
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Run one burst under the configured stopping policy
    pub fn run<E, C>(
        &mut self,
        population: &mut Population,
        evaluator: &E,
        progress: &mut C,
    ) -> Result<u64>
    where
        E: FitnessEvaluator + ?Sized,
        C: ProgressCallback + ?Sized,
    {
        let policy = self.stopping;
        self.run_until(population, evaluator, progress, &policy)
    }

    /// Run generations while `predicate` allows; returns the burst length
    pub fn run_until<E, C, P>(
        &mut self,
        population: &mut Population,
        evaluator: &E,
        progress: &mut C,
        predicate: &P,
    ) -> Result<u64>
    where
        E: FitnessEvaluator + ?Sized,
        C: ProgressCallback + ?Sized,
        P: Continuation + ?Sized,
    {
        self.state = EngineState::Running;
        let mut loop_state = LoopState {
            burst_generations: 0,
            total_generations: self.total_generations,
            burst_started: Instant::now(),
        };

        while predicate.should_continue(&loop_state) {
            if let Err(e) = self.step(population, evaluator, progress) {
                self.state = EngineState::Stopped;
                return Err(e);
            }
            loop_state.burst_generations += 1;
            loop_state.total_generations = self.total_generations;
        }

        self.state = EngineState::Stopped;
        Ok(loop_state.burst_generations)
    }

    /// One generation: evaluate, record, select, recombine, replace
    pub fn step<E, C>(
        &mut self,
        population: &mut Population,
        evaluator: &E,
        progress: &mut C,
    ) -> Result<()>
    where
        E: FitnessEvaluator + ?Sized,
        C: ProgressCallback + ?Sized,
    {
        let generation = self.total_generations + 1;
        progress.on_generation_start(generation);

        population.evaluate(evaluator)?;
        population.record_statistic(generation, self.config.calc_hamming_distance);

        let parents = self.selection.select(population, &mut self.rng)?;
        let next_generation = reproduce(
            &parents,
            self.config.crossover_rate,
            self.config.mutation_rate,
            &mut self.rng,
        );
        population.replace_genepool(next_generation);

        self.total_generations = generation;
        progress.on_generation_complete(generation, population.statistics().last());
        Ok(())
    }
}
