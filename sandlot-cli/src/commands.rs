use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use validator::Validate;

use sandlot_config::{ConfigError, SandlotConfig};
use sandlot_engine::{SimulationReport, SimulationRuntime};
use sandlot_simulator::dice::{strike_probability, RollResult, DICE_TABLE};
use sandlot_simulator::{OutcomeDistribution, ReplayReport, RunStatistics, Scenario, ScenarioFile};
use sandlot_telemetry::MetricsRecorder;

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "sandlot", version, about)]
pub struct Cli {
    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a Monte Carlo batch of half-innings
    Simulate(SimulateArgs),
    /// Run one batch per seed to show sampling spread
    Sweep(SweepArgs),
    /// Replay scripted outcome sequences with per-play traces
    Replay(ReplayArgs),
    /// Print the dice table and the outcome distribution
    Odds,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SimulateArgs {
    /// Half-innings to simulate
    #[arg(short = 'n', long)]
    pub innings: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Half-innings per game
    #[arg(long)]
    pub per_game: Option<usize>,
    #[arg(long)]
    pub threads: Option<usize>,
    /// Expected run digest; a mismatch fails and writes a report
    #[arg(long)]
    pub validate_hash: Option<String>,
    /// Write the statistics report as YAML
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Print Prometheus metrics after the batch (also `telemetry.metrics`)
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// First seed of the sweep
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of consecutive seeds
    #[arg(long, default_value_t = 5)]
    pub seeds: u64,
    /// Half-innings per seed
    #[arg(short = 'n', long)]
    pub innings: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// YAML scenario file
    #[arg(short, long, conflicts_with = "outcomes", required_unless_present = "outcomes")]
    pub scenario: Option<PathBuf>,
    /// Outcome codes to replay directly, e.g. "E14o1oK"
    #[arg(long)]
    pub outcomes: Option<String>,
    /// Only print the summary line of each scenario
    #[arg(short, long)]
    pub quiet: bool,
}

impl SimulateArgs {
    fn apply(&self, config: &mut SandlotConfig) {
        let sim = &mut config.simulator;
        if let Some(innings) = self.innings {
            sim.innings = innings;
        }
        if let Some(seed) = self.seed {
            sim.seed = seed;
        }
        if let Some(per_game) = self.per_game {
            sim.innings_per_game = per_game;
        }
        if self.threads.is_some() {
            sim.threads = self.threads;
        }
        if self.output.is_some() {
            config.report.output = self.output.clone();
        }
    }
}

impl SweepArgs {
    fn apply(&self, config: &mut SandlotConfig) {
        if let Some(innings) = self.innings {
            config.simulator.innings = innings;
        }
    }
}

/// Overrides from flags are checked against the same rules as the file.
fn revalidate(config: &SandlotConfig) -> Result<(), ConfigError> {
    config.validate().map_err(ConfigError::from)
}

pub async fn run_command(command: Commands, mut config: SandlotConfig) -> CliResult {
    match command {
        Commands::Simulate(args) => {
            args.apply(&mut config);
            revalidate(&config)?;
            let width = config.report.histogram_width;
            let show_metrics = args.metrics || config.telemetry.metrics;
            let runtime = SimulationRuntime::new(config, MetricsRecorder::new()?)?;
            let report = runtime.run_simulation(args.validate_hash.as_deref()).await?;
            print_simulation(&report, width);
            if show_metrics {
                println!("{}", runtime.metrics.gather_metrics()?);
            }
            Ok(())
        }
        Commands::Sweep(args) => {
            args.apply(&mut config);
            revalidate(&config)?;
            let first_seed = args.seed.unwrap_or(config.simulator.seed);
            let runtime = SimulationRuntime::new(config, MetricsRecorder::new()?)?;
            let entries = runtime.run_sweep(first_seed, args.seeds).await?;

            println!("{:>20}  {:>10}  {:>10}  digest", "seed", "per inning", "per game");
            for entry in &entries {
                let per_game = entry
                    .mean_runs_per_game
                    .map_or_else(|| "-".to_string(), |mean| format!("{mean:.4}"));
                println!(
                    "{:>20}  {:>10.4}  {:>10}  {}",
                    entry.seed, entry.mean_runs_per_inning, per_game, entry.digest
                );
            }
            Ok(())
        }
        Commands::Replay(args) => run_replay(args, config).await,
        Commands::Odds => {
            print_odds()?;
            Ok(())
        }
    }
}

async fn run_replay(args: ReplayArgs, config: SandlotConfig) -> CliResult {
    let scenarios = match (&args.scenario, &args.outcomes) {
        (Some(path), _) => ScenarioFile::load_from_file(path)?,
        (None, Some(codes)) => {
            let scenario = Scenario::inline("command line", codes.as_str());
            scenario.parse_outcomes()?;
            ScenarioFile {
                scenarios: vec![scenario],
            }
        }
        (None, None) => return Err("either --scenario or --outcomes is required".into()),
    };

    let runtime = SimulationRuntime::new(config, MetricsRecorder::new()?)?;
    let reports = runtime.run_replay(&scenarios).await?;
    for report in &reports {
        print_replay(report, args.quiet);
    }

    let failed = reports.iter().filter(|r| !r.matches_expectation()).count();
    if failed > 0 {
        return Err(format!("{failed} scenario(s) did not score their expected runs").into());
    }
    info!(scenarios = reports.len(), "Replay finished");
    Ok(())
}

fn print_simulation(report: &SimulationReport, width: usize) {
    println!(
        "Simulated {} half-innings (seed {}, {} threads) in {} ms",
        report.innings, report.seed, report.threads, report.elapsed_ms
    );
    println!("Plate appearances: {}", report.plate_appearances);
    println!("Run digest: {}", report.digest);
    println!();
    println!("Runs per half-inning");
    print_statistics(&report.per_inning, width);

    match &report.per_game {
        Some(games) => {
            println!();
            println!("Runs per {}-inning game", report.innings_per_game);
            print_statistics(games, width);
        }
        None => println!("Not enough innings for a single game."),
    }
}

fn print_statistics(stats: &RunStatistics, width: usize) {
    let p = &stats.percentiles;
    println!(
        "  mean {:.4}  sd {:.4}  median {:.1}  min {}  max {}  P(runs >= 1) {:.4}",
        stats.mean, stats.std_dev, stats.median, stats.min, stats.max, stats.scoring_rate
    );
    println!(
        "  p10 {}  p25 {}  p50 {}  p75 {}  p90 {}  p99 {}",
        p.p10, p.p25, p.p50, p.p75, p.p90, p.p99
    );
    print!("{}", stats.render_histogram(width));
}

fn print_replay(report: &ReplayReport, quiet: bool) {
    let verdict = match report.expected_runs {
        Some(expected) if expected == report.runs => "ok".to_string(),
        Some(expected) => format!("MISMATCH, expected {expected}"),
        None => "no expectation".to_string(),
    };
    println!(
        "{}: {} -> {} run(s) in {} plate appearances [{}]",
        report.name, report.outcomes, report.runs, report.plate_appearances, verdict
    );
    if !quiet {
        for line in &report.trace {
            println!("    {line}");
        }
    }
}

fn print_odds() -> CliResult {
    println!("Dice table");
    for roll in DICE_TABLE {
        let result = match roll.result {
            RollResult::Play(outcome) => format!("{} ({})", outcome, outcome.code()),
            RollResult::Strike => "strike".to_string(),
        };
        println!("  {}-{}  {}/36  {}", roll.low, roll.high, roll.ways(), result);
    }
    println!();
    println!("Strike roll probability: {:.4}", strike_probability());
    println!();

    let distribution = OutcomeDistribution::from_dice_table()?;
    println!("Outcome distribution");
    for (outcome, probability) in distribution.probabilities() {
        println!(
            "  {}  {:<14}  {:>7.4}  {:>6.2}%",
            outcome.code(),
            outcome.name(),
            distribution.weight(outcome),
            probability * 100.0
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_flags_override_config() {
        let cli = Cli::try_parse_from([
            "sandlot", "simulate", "-n", "500", "--seed", "9", "--per-game", "7", "--threads", "3",
        ])
        .unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };

        let mut config = SandlotConfig::default();
        args.apply(&mut config);
        assert_eq!(config.simulator.innings, 500);
        assert_eq!(config.simulator.seed, 9);
        assert_eq!(config.simulator.innings_per_game, 7);
        assert_eq!(config.simulator.threads, Some(3));
        assert!(revalidate(&config).is_ok());
    }

    #[test]
    fn invalid_override_fails_validation() {
        let mut config = SandlotConfig::default();
        SimulateArgs {
            innings: Some(0),
            ..SimulateArgs::default()
        }
        .apply(&mut config);
        assert!(matches!(
            revalidate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn replay_needs_a_source() {
        assert!(Cli::try_parse_from(["sandlot", "replay"]).is_err());
        assert!(Cli::try_parse_from([
            "sandlot", "replay", "--scenario", "a.yaml", "--outcomes", "KKK"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["sandlot", "replay", "--outcomes", "KKK"]).is_ok());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["sandlot", "odds", "--config", "custom.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    }

    #[tokio::test]
    async fn replay_of_inline_outcomes() {
        let args = ReplayArgs {
            scenario: None,
            outcomes: Some("o1o1o".into()),
            quiet: true,
        };
        assert!(run_replay(args, SandlotConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn replay_rejects_unknown_codes() {
        let args = ReplayArgs {
            scenario: None,
            outcomes: Some("o1x".into()),
            quiet: true,
        };
        assert!(run_replay(args, SandlotConfig::default()).await.is_err());
    }
}
