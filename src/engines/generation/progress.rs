use crate::types::Statistic;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: u64);
    fn on_generation_complete(&mut self, generation: u64, statistic: Option<&Statistic>);
}

/// Reports every finished generation through the `log` facade
pub struct LogProgressCallback {
    rank: usize,
}

impl LogProgressCallback {
    pub fn new(rank: usize) -> Self {
        Self { rank }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: u64) {
        log::trace!("rank {}: generation {} starting", self.rank, generation);
    }

    fn on_generation_complete(&mut self, generation: u64, statistic: Option<&Statistic>) {
        if let Some(s) = statistic {
            log::info!(
                "rank {}: generation {} best {:.4} ({} neighbours, {} overlaps), average {:.4}",
                self.rank,
                generation,
                s.best_fitness,
                s.best_valid_neighbors,
                s.best_overlaps,
                s.average_fitness
            );
        }
    }
}

pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_generation_start(&mut self, _generation: u64) {}

    fn on_generation_complete(&mut self, _generation: u64, _statistic: Option<&Statistic>) {}
}
