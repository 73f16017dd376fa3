//! ## sandlot-core::inning
//! **Half-inning state machine**
//!
//! Consumes at-bat outcomes one at a time, tracking outs, runs and runners,
//! and stops pulling outcomes the moment the third out is recorded.
//!
//! ### Resolution order for each outcome:
//! 1. Batter disposition: out, or batter-runner placed on base 0.
//! 2. Runner advancement for the outcome.
//! 3. Third out ends the inning; runners reaching home on that play do not score.
//! 4. Runners reaching home score and leave the bases.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::error::SimulationError;
use crate::outcome::Outcome;
use crate::runners::{Advance, RunnerSet, FIRST, SECOND, THIRD};

pub const OUTS_PER_INNING: u8 = 3;

/// Inning state as seen before an outcome is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InningSnapshot {
    pub outs: u8,
    pub runs: u32,
    pub runners: RunnerSet,
}

impl fmt::Display for InningSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} {}, runners {}",
            self.outs,
            if self.outs == 1 { "out" } else { "outs" },
            self.runs,
            if self.runs == 1 { "run" } else { "runs" },
            self.runners
        )
    }
}

/// What a single outcome did to the inning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub outcome: Outcome,
    pub outs_recorded: u8,
    pub runs_scored: u32,
    pub ends_inning: bool,
}

/// Summary of a finished half-inning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InningReport {
    pub runs: u32,
    pub plate_appearances: u32,
    pub left_on_base: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inning {
    outs: u8,
    runs: u32,
    runners: RunnerSet,
    plate_appearances: u32,
}

impl Inning {
    /// Fresh half-inning: no outs, no runs, bases empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts mid-inning from an arbitrary base/out state.
    pub fn from_parts(outs: u8, runs: u32, runners: RunnerSet) -> Result<Self, SimulationError> {
        if outs >= OUTS_PER_INNING {
            return Err(SimulationError::InvalidState(format!(
                "an inning in progress has fewer than {OUTS_PER_INNING} outs, got {outs}"
            )));
        }
        Ok(Self {
            outs,
            runs,
            runners,
            plate_appearances: 0,
        })
    }

    pub fn outs(&self) -> u8 {
        self.outs
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn runners(&self) -> RunnerSet {
        self.runners
    }

    pub fn plate_appearances(&self) -> u32 {
        self.plate_appearances
    }

    pub fn is_over(&self) -> bool {
        self.outs >= OUTS_PER_INNING
    }

    pub fn snapshot(&self) -> InningSnapshot {
        InningSnapshot {
            outs: self.outs,
            runs: self.runs,
            runners: self.runners,
        }
    }

    pub fn report(&self) -> InningReport {
        InningReport {
            runs: self.runs,
            plate_appearances: self.plate_appearances,
            left_on_base: self.runners.len() as u8,
        }
    }

    /// Applies one outcome.
    pub fn play(&mut self, outcome: Outcome) -> Result<Play, SimulationError> {
        if self.is_over() {
            return Err(SimulationError::InningOver);
        }
        trace!(
            outs = self.outs,
            runs = self.runs,
            runners = %self.runners,
            outcome = %outcome,
            "play"
        );

        let outs_before = self.outs;
        self.plate_appearances += 1;

        let mut runners = self.runners;
        if outcome.is_out() {
            self.record_out();
        } else {
            runners = runners.with_batter();
        }

        let advance = match outcome {
            Outcome::DoublePlay if runners.contains(FIRST) => {
                runners.remove(FIRST);
                self.record_out();
                runners.advance_by(|_| 1)
            }
            Outcome::OutAtFirst | Outcome::Error => runners.advance_by(|_| 1),
            Outcome::FlyOut if runners.contains(THIRD) && !self.is_over() => {
                runners.remove(THIRD);
                Advance { runners, scored: 1 }
            }
            Outcome::Single | Outcome::Double | Outcome::Triple | Outcome::HomeRun => {
                let bases = outcome.hit_bases().unwrap_or_default();
                runners.advance_by(|base| bases + single_bonus(outcome, base))
            }
            Outcome::BaseOnBalls => runners.advance_by(|base| {
                if runners.is_forced(base) {
                    1
                } else {
                    0
                }
            }),
            Outcome::Strikeout | Outcome::FoulOut | Outcome::DoublePlay | Outcome::FlyOut => {
                Advance { runners, scored: 0 }
            }
        };

        self.runners = advance.runners;
        let ends_inning = self.is_over();
        let runs_scored = if ends_inning { 0 } else { advance.scored };
        self.runs += runs_scored;

        Ok(Play {
            outcome,
            outs_recorded: self.outs - outs_before,
            runs_scored,
            ends_inning,
        })
    }

    /// Outs stop counting at the third; a double play with two outs records one.
    fn record_out(&mut self) {
        self.outs = (self.outs + 1).min(OUTS_PER_INNING);
    }
}

/// A runner on second scores from there on a single.
fn single_bonus(outcome: Outcome, base: u8) -> u8 {
    if outcome == Outcome::Single && base == SECOND {
        1
    } else {
        0
    }
}

/// Plays outcomes until three outs, reporting each state to `observer` first.
///
/// The observer sees the inning as it stands before the outcome is applied.
/// Outcomes after the third out are never pulled from the iterator.
pub fn play_inning_traced<I, F>(outcomes: I, mut observer: F) -> Result<InningReport, SimulationError>
where
    I: IntoIterator<Item = Outcome>,
    F: FnMut(&InningSnapshot, Outcome),
{
    let mut inning = Inning::new();
    for outcome in outcomes {
        observer(&inning.snapshot(), outcome);
        inning.play(outcome)?;
        if inning.is_over() {
            return Ok(inning.report());
        }
    }
    Err(SimulationError::EventStreamExhausted {
        outs: inning.outs,
        runs: inning.runs,
        plate_appearances: inning.plate_appearances,
    })
}

pub fn play_inning<I>(outcomes: I) -> Result<InningReport, SimulationError>
where
    I: IntoIterator<Item = Outcome>,
{
    play_inning_traced(outcomes, |_, _| {})
}

/// Total runs scored in a half-inning played from `outcomes`.
///
/// The caller must supply enough outcomes to reach three outs; an exhausted
/// stream is reported as [`SimulationError::EventStreamExhausted`].
pub fn simulate_inning<I>(outcomes: I) -> Result<u32, SimulationError>
where
    I: IntoIterator<Item = Outcome>,
{
    play_inning(outcomes).map(|report| report.runs)
}
