use hpfold::config::{AppConfig, SelectionMethod, StoppingMode};
use hpfold::distributed::run_local;
use hpfold::engines::evaluation::{FitnessEvaluator, HpLatticeEvaluator};
use hpfold::types::{Individual, Structure};
use hpfold::{FoldError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

fn small_run(ranks: usize) -> AppConfig {
    let mut config = AppConfig::default();
    config.evolution.primary_sequence = "HPHPPHHPHH".to_string();
    config.evolution.population_size = 50;
    config.evolution.tournament_size = 5;
    config.evolution.stopping_mode = StoppingMode::GenerationLimit;
    config.evolution.generation_limit = 8;
    config.evolution.seed = Some(17);
    config.migration.exchange_rounds = 2;
    config.migration.migrant_fraction = 0.2;
    config.cluster.ranks = ranks;
    config.cluster.message_timeout_ms = Some(30_000);
    config
}

#[test]
fn test_three_rank_run_produces_champion() {
    let config = small_run(3);
    let evaluator = HpLatticeEvaluator::new(&config.evolution.primary_sequence).unwrap();

    let outcomes = run_local(&config, &evaluator).unwrap();
    assert_eq!(outcomes.len(), 3);
    for (rank, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.rank, rank);
        assert_eq!(outcome.population.len(), 50);
        assert_eq!(outcome.local_generations, 8);
        assert!(outcome.population.genepool().iter().all(|i| i.len() == 9));
    }
    assert!(outcomes[1..].iter().all(|o| o.champion.is_none() && o.report.is_none()));

    let champion = outcomes[0].champion.as_ref().unwrap();
    let champion_best = champion.best().unwrap();
    assert_eq!(champion.len(), 3);
    for outcome in &outcomes {
        let local = outcome.population.best().unwrap();
        assert!(champion_best.fitness() >= local.fitness());
    }

    // Re-scoring is deterministic
    let rescored = evaluator.evaluate(champion_best.individual()).unwrap();
    assert_eq!(&rescored, champion_best);

    let report = outcomes[0].report.as_ref().unwrap();
    let local_total: u64 = outcomes.iter().map(|o| o.local_generations).sum();
    assert_eq!(report.ranks, 3);
    assert_eq!(report.global_generation_count, local_total);
    assert_eq!(report.global_individual_count, local_total * 50);
    assert_eq!(report.candidates.len(), 3);
    assert_eq!(report.best.fitness, champion_best.fitness());
    assert_eq!(report.statistics.len(), 8);
}

#[test]
fn test_single_rank_run_without_migration() {
    let mut config = small_run(1);
    config.evolution.selection_method = SelectionMethod::TournamentBest;
    config.evolution.documents_statistic = false;
    let evaluator = HpLatticeEvaluator::new(&config.evolution.primary_sequence).unwrap();

    let outcomes = run_local(&config, &evaluator).unwrap();
    let report = outcomes[0].report.as_ref().unwrap();
    assert_eq!(report.global_generation_count, 8);
    assert_eq!(report.candidates.len(), 1);
    assert!(report.statistics.is_empty());
    assert_eq!(outcomes[0].population.statistics().len(), 8);
}

#[test]
fn test_time_limited_run_finishes() {
    let mut config = small_run(2);
    config.evolution.stopping_mode = StoppingMode::TimeLimit;
    config.evolution.time_limit_ms = 100;
    let evaluator = HpLatticeEvaluator::new(&config.evolution.primary_sequence).unwrap();

    let outcomes = run_local(&config, &evaluator).unwrap();
    let report = outcomes[0].report.as_ref().unwrap();
    assert_eq!(
        report.global_generation_count,
        outcomes.iter().map(|o| o.local_generations).sum::<u64>()
    );
    assert!(outcomes.iter().all(|o| o.population.len() == 50));
}

#[test]
fn test_invalid_config_fails_before_any_rank_starts() {
    let mut config = small_run(2);
    config.evolution.generation_limit = 1;
    let evaluator = HpLatticeEvaluator::new(&config.evolution.primary_sequence).unwrap();
    assert!(matches!(
        run_local(&config, &evaluator),
        Err(FoldError::Configuration(_))
    ));
}

/// Lattice scoring that fails once, on its `fail_at`-th call across all ranks
struct FailingEvaluator {
    inner: HpLatticeEvaluator,
    calls: AtomicUsize,
    fail_at: usize,
}

impl FitnessEvaluator for FailingEvaluator {
    fn evaluate(&self, individual: &Individual) -> Result<Structure> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_at {
            return Err(FoldError::Evaluation("lattice walk failed".to_string()));
        }
        self.inner.evaluate(individual)
    }
}

#[test]
fn test_failing_rank_reports_its_own_error() {
    for ranks in [2, 4] {
        let config = small_run(ranks);
        let evaluator = FailingEvaluator {
            inner: HpLatticeEvaluator::new(&config.evolution.primary_sequence).unwrap(),
            calls: AtomicUsize::new(0),
            fail_at: 300,
        };

        let started = Instant::now();
        let result = run_local(&config, &evaluator);
        assert!(
            matches!(result, Err(FoldError::Evaluation(_))),
            "{} ranks returned {:?}",
            ranks,
            result.map(|outcomes| outcomes.len())
        );
        // Neighbours fail on disconnect, well before the message timeout
        assert!(started.elapsed() < Duration::from_secs(20));
    }
}
