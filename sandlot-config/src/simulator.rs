//! Monte Carlo simulator configuration.
//!
//! Controls how many half-innings are sampled, how they are grouped into
//! games, and how the work is spread across threads.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Seed for deterministic simulation.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of half-innings to simulate. Every inning's run total is kept
    /// in memory for the digest and game totals.
    #[serde(default = "default_innings")]
    #[validate(range(min = 1, max = 100_000_000))]
    pub innings: usize,

    /// Half-innings summed into one game total.
    #[serde(default = "default_innings_per_game")]
    #[validate(range(min = 1, max = 99))]
    pub innings_per_game: usize,

    /// Worker threads; `None` lets the thread pool pick one per core.
    #[serde(default)]
    #[validate(range(min = 1, max = 1024))]
    pub threads: Option<usize>,
}

fn default_seed() -> u64 {
    42
}

fn default_innings() -> usize {
    1_000_000
}

fn default_innings_per_game() -> usize {
    9
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            innings: default_innings(),
            innings_per_game: default_innings_per_game(),
            threads: None,
        }
    }
}

impl SimulatorConfig {
    /// Threads the batch will actually use.
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}
