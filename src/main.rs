use anyhow::{Context, Result};
use clap::Parser;
use hpfold::config::{AppConfig, ConfigManager, StoppingMode};
use hpfold::distributed::run_local;
use hpfold::engines::evaluation::HpLatticeEvaluator;
use std::path::PathBuf;

/// Fold an HP sequence with an island-model genetic algorithm.
///
/// Environment overrides use HPFOLD__<SECTION>__<KEY>, e.g.
/// HPFOLD__EVOLUTION__POPULATION_SIZE=500
#[derive(Parser, Debug)]
#[command(name = "hpfold")]
#[command(version, about)]
struct Cli {
    /// TOML or JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total generations per rank
    #[arg(long = "generation")]
    generation_limit: Option<u64>,

    /// Total wall-clock time per rank in milliseconds; wins over --generation
    #[arg(long = "time")]
    time_limit_ms: Option<u64>,

    /// Number of ranks on the ring
    #[arg(long)]
    ranks: Option<usize>,

    /// Write the results record as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the effective configuration and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(limit) = self.generation_limit {
            config.evolution.stopping_mode = StoppingMode::GenerationLimit;
            config.evolution.generation_limit = limit;
        }
        if let Some(limit) = self.time_limit_ms {
            config.evolution.stopping_mode = StoppingMode::TimeLimit;
            config.evolution.time_limit_ms = limit;
        }
        if let Some(ranks) = self.ranks {
            config.cluster.ranks = ranks;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let manager = ConfigManager::new();
    match &cli.config {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => manager.load_from_env()?,
    }
    manager.update(|c| cli.apply_overrides(c))?;

    if let Some(path) = &cli.write_config {
        manager.save_to_file(path)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let config = manager.get()?;
    let evaluator = HpLatticeEvaluator::new(&config.evolution.primary_sequence)?;
    match config.evolution.stopping_mode {
        StoppingMode::GenerationLimit => log::info!(
            "generation limited run: {} generations per rank on {} ranks",
            config.evolution.generation_limit,
            config.cluster.ranks
        ),
        StoppingMode::TimeLimit => log::info!(
            "time limited run: {} ms per rank on {} ranks",
            config.evolution.time_limit_ms,
            config.cluster.ranks
        ),
    }

    let outcomes = run_local(&config, &evaluator)?;
    let report = outcomes
        .into_iter()
        .find_map(|o| o.report)
        .context("root rank produced no report")?;

    println!("Calculation took: {} ms", report.elapsed_ms);
    println!("Calculated generations: {}", report.global_generation_count);
    println!("Calculated individuals: {}", report.global_individual_count);
    for (rank, candidate) in report.candidates.iter().enumerate() {
        println!(
            "  rank {}: {} valid neighbours, {} overlaps",
            rank, candidate.valid_neighbors, candidate.overlaps
        );
    }
    println!(
        "Best fold: {} ({} valid neighbours, {} overlaps, fitness {:.4})",
        report.best.moves, report.best.valid_neighbors, report.best.overlaps, report.best.fitness
    );

    if let Some(path) = &cli.report {
        report
            .save_to_file(path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_limit_wins_over_generation_limit() {
        let cli = Cli::try_parse_from(["hpfold", "--time", "500", "--generation", "40"]).unwrap();
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.evolution.stopping_mode, StoppingMode::TimeLimit);
        assert_eq!(config.evolution.time_limit_ms, 500);
    }

    #[test]
    fn test_generation_flag_alone_selects_generation_limit() {
        let cli = Cli::try_parse_from(["hpfold", "--generation", "40", "--ranks", "2"]).unwrap();
        let mut config = AppConfig::default();
        config.evolution.stopping_mode = StoppingMode::TimeLimit;
        cli.apply_overrides(&mut config);

        assert_eq!(config.evolution.stopping_mode, StoppingMode::GenerationLimit);
        assert_eq!(config.evolution.generation_limit, 40);
        assert_eq!(config.cluster.ranks, 2);
    }

    #[test]
    fn test_empty_argv_parses_to_defaults() {
        let cli = Cli::try_parse_from(Vec::<String>::new()).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.generation_limit.is_none());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["hpfold", "--population", "5"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
