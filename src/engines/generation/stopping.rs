use crate::config::{EvolutionConfig, StoppingMode};
use std::time::{Duration, Instant};

/// Counters the continuation predicate sees before each generation
#[derive(Debug, Clone, Copy)]
pub struct LoopState {
    /// Generations finished in the current burst
    pub burst_generations: u64,
    /// Generations finished since the engine was created
    pub total_generations: u64,
    pub burst_started: Instant,
}

impl LoopState {
    pub fn elapsed(&self) -> Duration {
        self.burst_started.elapsed()
    }
}

/// Decides whether the loop runs another generation. Checked between
/// generations only; a generation in progress always completes.
pub trait Continuation {
    fn should_continue(&self, state: &LoopState) -> bool;
}

impl<F> Continuation for F
where
    F: Fn(&LoopState) -> bool,
{
    fn should_continue(&self, state: &LoopState) -> bool {
        self(state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoppingPolicy {
    GenerationLimit(u64),
    TimeLimit(Duration),
}

impl StoppingPolicy {
    /// Per-burst policy: the configured limit is a per-rank total spread
    /// evenly over the exchange rounds.
    pub fn per_burst(config: &EvolutionConfig, exchange_rounds: usize) -> Self {
        let rounds = exchange_rounds.max(1) as u64;
        match config.stopping_mode {
            StoppingMode::GenerationLimit => {
                StoppingPolicy::GenerationLimit((config.generation_limit / rounds).max(1))
            }
            StoppingMode::TimeLimit => StoppingPolicy::TimeLimit(Duration::from_millis(
                (config.time_limit_ms / rounds).max(1),
            )),
        }
    }
}

impl Continuation for StoppingPolicy {
    fn should_continue(&self, state: &LoopState) -> bool {
        match *self {
            StoppingPolicy::GenerationLimit(limit) => state.burst_generations < limit,
            StoppingPolicy::TimeLimit(limit) => state.elapsed() <= limit,
        }
    }
}
