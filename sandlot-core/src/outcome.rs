//! ## sandlot-core::outcome
//! **Closed alphabet of at-bat results**
//!
//! Every outcome maps to exactly one batter rule and one runner rule, so the
//! set is exhaustive and closed. Symbols outside it are rejected when parsed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single at-bat result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Strikeout,
    FoulOut,
    OutAtFirst,
    FlyOut,
    DoublePlay,
    Single,
    Double,
    Triple,
    HomeRun,
    Error,
    BaseOnBalls,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseOutcomeError {
    #[error("unknown outcome symbol: {0:?}")]
    UnknownSymbol(String),

    #[error("unknown outcome code {code:?} at position {position}")]
    UnknownCode { code: char, position: usize },
}

impl Outcome {
    pub const COUNT: usize = 11;

    pub const ALL: [Outcome; Outcome::COUNT] = [
        Outcome::Strikeout,
        Outcome::FoulOut,
        Outcome::OutAtFirst,
        Outcome::FlyOut,
        Outcome::DoublePlay,
        Outcome::Single,
        Outcome::Double,
        Outcome::Triple,
        Outcome::HomeRun,
        Outcome::Error,
        Outcome::BaseOnBalls,
    ];

    /// Position within [`Outcome::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// One-character code used in compact sequences and traces.
    pub const fn code(self) -> char {
        match self {
            Outcome::Strikeout => 'K',
            Outcome::FoulOut => 'O',
            Outcome::OutAtFirst => 'o',
            Outcome::FlyOut => 'f',
            Outcome::DoublePlay => 'D',
            Outcome::Single => '1',
            Outcome::Double => '2',
            Outcome::Triple => '3',
            Outcome::HomeRun => '4',
            Outcome::Error => 'E',
            Outcome::BaseOnBalls => 'B',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Outcome::Strikeout => "strikeout",
            Outcome::FoulOut => "foul-out",
            Outcome::OutAtFirst => "out-at-first",
            Outcome::FlyOut => "fly-out",
            Outcome::DoublePlay => "double-play",
            Outcome::Single => "single",
            Outcome::Double => "double",
            Outcome::Triple => "triple",
            Outcome::HomeRun => "home-run",
            Outcome::Error => "error",
            Outcome::BaseOnBalls => "base-on-balls",
        }
    }

    pub fn from_code(code: char) -> Option<Outcome> {
        Outcome::ALL.into_iter().find(|o| o.code() == code)
    }

    /// Whether the batter is put out.
    pub const fn is_out(self) -> bool {
        matches!(
            self,
            Outcome::Strikeout
                | Outcome::FoulOut
                | Outcome::OutAtFirst
                | Outcome::FlyOut
                | Outcome::DoublePlay
        )
    }

    /// Whether the batter becomes a runner.
    pub const fn batter_reaches(self) -> bool {
        !self.is_out()
    }

    /// Bases credited by a hit, `None` for anything that is not a hit.
    pub const fn hit_bases(self) -> Option<u8> {
        match self {
            Outcome::Single => Some(1),
            Outcome::Double => Some(2),
            Outcome::Triple => Some(3),
            Outcome::HomeRun => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    /// Accepts either the one-character code or the kebab-case name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(outcome) = Outcome::from_code(c) {
                return Ok(outcome);
            }
        }
        Outcome::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOutcomeError::UnknownSymbol(s.to_string()))
    }
}

/// Parses a compact code string such as `"o1o1o"`.
///
/// Whitespace and commas are ignored so sequences can be grouped for reading.
pub fn parse_sequence(codes: &str) -> Result<Vec<Outcome>, ParseOutcomeError> {
    codes
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace() && *c != ',')
        .map(|(position, code)| {
            Outcome::from_code(code).ok_or(ParseOutcomeError::UnknownCode { code, position })
        })
        .collect()
}

/// Renders outcomes back into their compact code string.
pub fn format_sequence(outcomes: &[Outcome]) -> String {
    outcomes.iter().map(|o| o.code()).collect()
}
