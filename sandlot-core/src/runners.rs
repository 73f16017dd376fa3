//! ## sandlot-core::runners
//! **Fixed-capacity base occupancy**
//!
//! Bases are numbered 1..=3 between plays. While a play resolves, the
//! batter-runner stands on base 0 (home plate) until advancement moves them.
//! Any runner pushed to [`HOME`] or beyond has scored and leaves the set.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const BATTER: u8 = 0;
pub const FIRST: u8 = 1;
pub const SECOND: u8 = 2;
pub const THIRD: u8 = 3;
pub const HOME: u8 = 4;

/// Occupied bases, one bit per base (bit 0 is the batter-runner mid-play).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct RunnerSet {
    occupied: u8,
}

/// Result of moving every runner in a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Advance {
    pub runners: RunnerSet,
    pub scored: u32,
}

impl RunnerSet {
    pub const fn empty() -> Self {
        Self { occupied: 0 }
    }

    /// Bases loaded.
    pub const fn full() -> Self {
        Self { occupied: 0b1110 }
    }

    /// Builds a set from base numbers, `None` if any base is outside 1..=3.
    pub fn from_bases<I: IntoIterator<Item = u8>>(bases: I) -> Option<Self> {
        let mut set = Self::empty();
        for base in bases {
            if !(FIRST..=THIRD).contains(&base) {
                return None;
            }
            set.occupied |= 1 << base;
        }
        Some(set)
    }

    #[inline]
    pub const fn contains(self, base: u8) -> bool {
        base < HOME && self.occupied & (1 << base) != 0
    }

    pub const fn len(self) -> usize {
        (self.occupied & 0b1110).count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.occupied & 0b1110 == 0
    }

    /// Occupied bases 1..=3 in ascending order.
    pub fn bases(self) -> impl Iterator<Item = u8> {
        (FIRST..HOME).filter(move |&base| self.contains(base))
    }

    /// Like [`bases`](Self::bases), but includes the batter-runner on base 0.
    fn runners_in_play(self) -> impl Iterator<Item = u8> {
        (BATTER..HOME).filter(move |&base| self.contains(base))
    }

    pub(crate) fn with_batter(self) -> Self {
        Self {
            occupied: self.occupied | 1 << BATTER,
        }
    }

    pub(crate) fn remove(&mut self, base: u8) {
        self.occupied &= !(1 << base);
    }

    /// A runner is forced when every base behind them is occupied.
    ///
    /// The batter-runner on base 0 counts as occupying the base behind first,
    /// so a walk always forces a runner on first.
    pub(crate) fn is_forced(self, base: u8) -> bool {
        (BATTER..base).all(|behind| self.contains(behind))
    }

    /// Moves every runner `step(base)` bases, collecting those who reach home.
    pub(crate) fn advance_by(self, step: impl Fn(u8) -> u8) -> Advance {
        let mut runners = RunnerSet::empty();
        let mut scored = 0;
        for base in self.runners_in_play() {
            let to = base + step(base);
            if to >= HOME {
                scored += 1;
            } else {
                runners.occupied |= 1 << to;
            }
        }
        Advance { runners, scored }
    }
}

impl fmt::Debug for RunnerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.bases()).finish()
    }
}

impl fmt::Display for RunnerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<RunnerSet> for Vec<u8> {
    fn from(set: RunnerSet) -> Self {
        set.bases().collect()
    }
}

impl TryFrom<Vec<u8>> for RunnerSet {
    type Error = String;

    fn try_from(bases: Vec<u8>) -> Result<Self, Self::Error> {
        RunnerSet::from_bases(bases.iter().copied())
            .ok_or_else(|| format!("runner bases must be within 1..=3, got {bases:?}"))
    }
}
