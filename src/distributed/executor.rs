use crate::config::AppConfig;
use crate::distributed::collector::collect_champion;
use crate::distributed::migration::MigrationProtocol;
use crate::distributed::statistics::reduce_generation_count;
use crate::distributed::topology::RingTopology;
use crate::distributed::transport::{LocalCluster, Transport};
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    GeneticAlgorithm, LogProgressCallback, Population, ProgressCallback, SilentProgress,
    StoppingPolicy,
};
use crate::error::{FoldError, Result};
use crate::report::{RunReport, StructureSummary};
use chrono::Utc;
use std::thread;
use std::time::Instant;

/// What one rank holds once the run is over
pub struct RankOutcome {
    pub rank: usize,
    pub population: Population,
    pub local_generations: u64,
    /// Only root carries the collected champion and report
    pub champion: Option<Population>,
    pub report: Option<RunReport>,
}

/// Run one rank of the island model to completion.
///
/// Evolves `exchange_rounds` bursts with a migration after each, then joins
/// the generation-count reduction and best-candidate collection at root.
pub fn execute_rank<T, E>(config: &AppConfig, transport: &T, evaluator: &E) -> Result<RankOutcome>
where
    T: Transport + ?Sized,
    E: FitnessEvaluator + ?Sized,
{
    config.validate()?;
    let started = Instant::now();
    let started_at = Utc::now();

    let topology = RingTopology::new(transport.rank(), transport.size())?;
    let rank = topology.rank();
    let evolution = &config.evolution;
    let rounds = config.migration.exchange_rounds;
    let genome_length = evolution.genome_length()?;

    let stopping = StoppingPolicy::per_burst(evolution, rounds);
    let mut engine = GeneticAlgorithm::new(evolution.clone(), stopping);
    if let Some(seed) = evolution.seed {
        engine = engine.with_seed(seed.wrapping_add(rank as u64));
    }
    let mut progress: Box<dyn ProgressCallback> = if evolution.print_while_generating {
        Box::new(LogProgressCallback::new(rank))
    } else {
        Box::new(SilentProgress)
    };

    let migration = MigrationProtocol::new(
        topology,
        config.migration.migrants_per_exchange(evolution.population_size),
        genome_length,
    );

    let mut population = engine.generate_start_population(genome_length);
    for round in 0..rounds {
        engine.run(&mut population, evaluator, progress.as_mut())?;
        migration.run_round(transport, &mut population, engine.rng_mut())?;
        if topology.is_root() {
            log::info!("finished exchange round {}/{}", round + 1, rounds);
        }
    }

    // A tight time limit can leave a burst without a single generation
    if population.best().is_none() {
        population.evaluate(evaluator)?;
    }
    if let Some(best) = population.best() {
        log::info!(
            "rank {}: best structure has {} valid neighbours with {} overlaps",
            rank,
            best.valid_neighbor_count(),
            best.overlap_count()
        );
    }

    let local_generations = engine.total_generations();
    let global_generations = reduce_generation_count(transport, local_generations)?;
    let champion = collect_champion(transport, &population, evaluator, genome_length)?;

    let report = match (&champion, global_generations) {
        (Some(champion), Some(global_generation_count)) => {
            let best = champion.best().ok_or_else(|| {
                FoldError::Generation("champion population has no best structure".to_string())
            })?;
            log::info!(
                "champion has {} valid neighbours after {} generations across {} ranks",
                best.valid_neighbor_count(),
                global_generation_count,
                topology.size()
            );
            Some(RunReport {
                started_at,
                elapsed_ms: started.elapsed().as_millis() as u64,
                ranks: topology.size(),
                global_generation_count,
                global_individual_count: global_generation_count
                    * evolution.population_size as u64,
                best: StructureSummary::from(best),
                candidates: champion.structures().iter().map(StructureSummary::from).collect(),
                statistics: if evolution.documents_statistic {
                    population.statistics().to_vec()
                } else {
                    Vec::new()
                },
            })
        }
        _ => None,
    };

    Ok(RankOutcome {
        rank,
        population,
        local_generations,
        champion,
        report,
    })
}

/// Run every rank on its own thread over an in-process [`LocalCluster`].
///
/// Outcomes come back in rank order. If any rank fails the whole run fails and
/// no partial report is produced. A failing rank disconnects its channels, so
/// its neighbours fail with `Transport` errors; the returned error is the
/// lowest-ranked one that is not such a follow-on failure, or the
/// lowest-ranked error when every failure is a transport failure.
pub fn run_local<E>(config: &AppConfig, evaluator: &E) -> Result<Vec<RankOutcome>>
where
    E: FitnessEvaluator + ?Sized,
{
    config.validate()?;
    let endpoints = LocalCluster::endpoints(config.cluster.ranks, config.cluster.message_timeout());

    let results: Vec<Result<RankOutcome>> = thread::scope(|scope| {
        let handles: Vec<_> = endpoints
            .into_iter()
            .map(|endpoint| {
                scope.spawn(move || {
                    let outcome = execute_rank(config, &endpoint, evaluator);
                    if let Err(e) = &outcome {
                        log::error!("rank {} failed: {}", endpoint.rank(), e);
                    }
                    outcome
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(FoldError::Generation(format!("rank {} panicked", rank))))
            })
            .collect()
    });

    let mut outcomes = Vec::with_capacity(results.len());
    let mut failure: Option<FoldError> = None;
    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                let replaces = match &failure {
                    None => true,
                    Some(FoldError::Transport(_)) => !matches!(e, FoldError::Transport(_)),
                    Some(_) => false,
                };
                if replaces {
                    failure = Some(e);
                }
            }
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(outcomes),
    }
}
