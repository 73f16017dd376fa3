use thiserror::Error;

use crate::outcome::ParseOutcomeError;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Outcome stream ended before three outs ({outs} outs, {runs} runs after {plate_appearances} plate appearances)")]
    EventStreamExhausted {
        outs: u8,
        runs: u32,
        plate_appearances: u32,
    },

    #[error("Inning is already over")]
    InningOver,

    #[error("Invalid inning state: {0}")]
    InvalidState(String),

    #[error("Invalid outcome: {0}")]
    InvalidOutcome(#[from] ParseOutcomeError),

    #[error("Outcome distribution error: {0}")]
    Distribution(String),
}
