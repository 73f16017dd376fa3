//! ## sandlot-simulator::monte_carlo
//! **Parallel batches of independent half-innings**
//!
//! ### Expectations:
//! - Inning `i` draws from its own RNG seeded with `seed + i`, so a batch is
//!   reproducible regardless of how many threads run it
//! - Games are consecutive groups of innings; a trailing partial group is dropped
//! - The BLAKE3 digest of the per-inning run stream identifies a batch

use std::time::{Duration, Instant};

use blake3::Hasher;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use sandlot_core::{play_inning, InningReport, SimulationError};

use crate::dice::OutcomeDistribution;

/// Parameters of one Monte Carlo batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSpec {
    pub seed: u64,
    pub innings: usize,
    pub innings_per_game: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub spec: BatchSpec,
    pub inning_runs: Vec<u32>,
    pub game_runs: Vec<u32>,
    pub plate_appearances: u64,
    pub digest: String,
    pub elapsed: Duration,
}

#[inline]
pub fn inning_seed(seed: u64, inning: usize) -> u64 {
    seed.wrapping_add(inning as u64)
}

/// Plays a single half-inning from a seeded dice source.
pub fn simulate_one(
    distribution: &OutcomeDistribution,
    seed: u64,
) -> Result<InningReport, SimulationError> {
    play_inning(distribution.source(SmallRng::seed_from_u64(seed)))
}

/// Runs of every inning in order, plus the total plate appearances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InningRuns {
    pub runs: Vec<u32>,
    pub plate_appearances: u64,
}

/// Plays `innings` independent half-innings on the current rayon pool.
///
/// Only the run total and plate appearances of each inning are kept.
pub fn simulate_innings(
    distribution: &OutcomeDistribution,
    seed: u64,
    innings: usize,
) -> Result<InningRuns, SimulationError> {
    let (runs, plate_appearances): (Vec<u32>, Vec<u32>) = (0..innings)
        .into_par_iter()
        .map(|i| {
            simulate_one(distribution, inning_seed(seed, i))
                .map(|report| (report.runs, report.plate_appearances))
        })
        .collect::<Result<_, _>>()?;

    Ok(InningRuns {
        runs,
        plate_appearances: plate_appearances.iter().map(|&pa| u64::from(pa)).sum(),
    })
}

/// Sums consecutive groups of `innings_per_game` innings into game totals.
pub fn compose_games(inning_runs: &[u32], innings_per_game: usize) -> Vec<u32> {
    if innings_per_game == 0 {
        return Vec::new();
    }
    inning_runs
        .chunks_exact(innings_per_game)
        .map(|game| game.iter().sum())
        .collect()
}

/// Hex BLAKE3 digest of a run stream.
pub fn run_digest(inning_runs: &[u32]) -> String {
    let mut hasher = Hasher::new();
    for runs in inning_runs {
        hasher.update(&runs.to_le_bytes());
    }
    hex::encode(hasher.finalize().as_bytes())
}

/// Runs a full batch: innings, game totals and digest.
#[instrument(level = "info", skip(distribution), fields(seed = spec.seed, innings = spec.innings))]
pub fn run_batch(
    distribution: &OutcomeDistribution,
    spec: BatchSpec,
) -> Result<BatchResult, SimulationError> {
    let start = Instant::now();
    let InningRuns {
        runs: inning_runs,
        plate_appearances,
    } = simulate_innings(distribution, spec.seed, spec.innings)?;
    let elapsed = start.elapsed();

    let game_runs = compose_games(&inning_runs, spec.innings_per_game);
    let digest = run_digest(&inning_runs);

    debug!(
        games = game_runs.len(),
        plate_appearances, "Batch innings resolved"
    );
    info!(
        elapsed_ms = elapsed.as_millis() as u64,
        digest = %digest,
        "Batch complete"
    );

    Ok(BatchResult {
        spec,
        inning_runs,
        game_runs,
        plate_appearances,
        digest,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(seed: u64, innings: usize) -> BatchSpec {
        BatchSpec {
            seed,
            innings,
            innings_per_game: 9,
        }
    }

    #[test]
    fn compose_games_drops_partial_game() {
        let runs = [1, 0, 0, 2, 0, 0, 0, 0, 1, 3, 3];
        assert_eq!(compose_games(&runs, 9), vec![4]);
        assert_eq!(compose_games(&runs, 5), vec![3, 4]);
        assert!(compose_games(&runs, 0).is_empty());
    }

    #[test]
    fn digest_depends_on_order() {
        assert_ne!(run_digest(&[0, 1]), run_digest(&[1, 0]));
        assert_eq!(run_digest(&[2, 3]), run_digest(&[2, 3]));
        assert_eq!(run_digest(&[]).len(), 64);
    }

    #[test]
    fn batch_is_reproducible() {
        let dist = OutcomeDistribution::from_dice_table().unwrap();
        let a = run_batch(&dist, spec(42, 2_000)).unwrap();
        let b = run_batch(&dist, spec(42, 2_000)).unwrap();
        assert_eq!(a.inning_runs, b.inning_runs);
        assert_eq!(a.digest, b.digest);
        assert_eq!(a.game_runs.len(), 2_000 / 9);

        let c = run_batch(&dist, spec(43, 2_000)).unwrap();
        assert_ne!(a.digest, c.digest);
    }

    #[test]
    fn batch_is_independent_of_thread_count() {
        let dist = OutcomeDistribution::from_dice_table().unwrap();
        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap()
            .install(|| run_batch(&dist, spec(7, 1_000)))
            .unwrap();
        let many = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap()
            .install(|| run_batch(&dist, spec(7, 1_000)))
            .unwrap();
        assert_eq!(single.digest, many.digest);
    }

    #[test]
    fn inning_matches_its_seed() {
        let dist = OutcomeDistribution::from_dice_table().unwrap();
        let batch = simulate_innings(&dist, 100, 10).unwrap();
        let fifth = simulate_one(&dist, inning_seed(100, 5)).unwrap();
        assert_eq!(batch.runs[5], fifth.runs);

        let total: u64 = (0..10)
            .map(|i| {
                let report = simulate_one(&dist, inning_seed(100, i)).unwrap();
                u64::from(report.plate_appearances)
            })
            .sum();
        assert_eq!(batch.plate_appearances, total);
    }

    #[test]
    fn every_inning_has_at_least_three_plate_appearances() {
        let dist = OutcomeDistribution::from_dice_table().unwrap();
        let result = run_batch(&dist, spec(1, 500)).unwrap();
        assert!(result.plate_appearances >= 3 * 500);
    }
}
