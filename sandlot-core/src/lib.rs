//! # sandlot-core
//!
//! Half-inning resolution for a dice-driven baseball game.
//!
//! The core is a small state machine: it consumes at-bat outcomes one at a
//! time, moves runners, counts outs, and returns the runs scored once three
//! outs are recorded. It never produces randomness of its own; outcomes come
//! from any iterator, finite or endless.
//!
//! ### Key Submodules:
//! - `outcome`: The closed alphabet of at-bat results and its compact codes
//! - `runners`: Fixed-capacity base occupancy
//! - `inning`: Inning state, per-play resolution and the traced driver loop
//!
//! ```
//! use sandlot_core::{parse_sequence, simulate_inning};
//!
//! let outcomes = parse_sequence("o1o1o").unwrap();
//! assert_eq!(simulate_inning(outcomes).unwrap(), 1);
//! ```

pub mod error;
pub mod inning;
pub mod outcome;
pub mod runners;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::inning::*;
    pub use crate::outcome::*;
    pub use crate::runners::RunnerSet;
}

pub use error::SimulationError;
pub use inning::{
    play_inning, play_inning_traced, simulate_inning, Inning, InningReport, InningSnapshot, Play,
    OUTS_PER_INNING,
};
pub use outcome::{format_sequence, parse_sequence, Outcome, ParseOutcomeError};
pub use runners::RunnerSet;
