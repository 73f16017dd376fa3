// sandlot-simulator/src/lib.rs

/*!
# Sandlot Simulator

Everything around the inning state machine: where outcomes come from, how
many innings are played, and what is learned from them.

## Key Components:
- **Dice Table:** Two-dice roll results and the weighted outcome distribution built from them.
- **Event Source:** Seedable, endless outcome iterator consumed lazily by the inning simulator.
- **Monte Carlo Driver:** Parallel, reproducible batches of independent half-innings grouped into games.
- **Statistics:** Moments, percentiles and histograms of run totals.
- **Replay Engine:** Scripted outcome sequences with per-play traces.
*/

pub mod dice;
pub mod monte_carlo;
pub mod replay;
pub mod statistics;

pub use dice::{DiceEventSource, OutcomeDistribution, DICE_TABLE};
pub use monte_carlo::{compose_games, run_batch, run_digest, BatchResult, BatchSpec, InningRuns};
pub use replay::{replay, ReplayReport, Scenario, ScenarioError, ScenarioFile};
pub use statistics::{mean_runs, RunStatistics};
