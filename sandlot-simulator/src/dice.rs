//! ## sandlot-simulator::dice
//! **Two-dice outcome table and the weighted event source built from it**
//!
//! Each unordered pair of faces maps to one result. Doubles can be rolled one
//! way out of 36, mixed pairs two ways. A strike roll is not an outcome on its
//! own: the batter keeps rolling until three strikes or one non-strike roll.
//! With `p` the chance of a single strike roll, a strikeout happens with
//! probability `p^3` and any other result `X` with
//! `(1 + p + p^2) * ways(X) / 36`.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use serde::Serialize;

use sandlot_core::{Outcome, SimulationError};

use Outcome::*;
use RollResult::{Play, Strike};

pub const ROLL_COMBINATIONS: u32 = 36;
pub const STRIKES_PER_STRIKEOUT: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollResult {
    Play(Outcome),
    Strike,
}

/// One unordered pair of faces (`low <= high`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceRoll {
    pub low: u8,
    pub high: u8,
    pub result: RollResult,
}

impl DiceRoll {
    const fn new(low: u8, high: u8, result: RollResult) -> Self {
        Self { low, high, result }
    }

    /// Ordered rolls (out of 36) that produce this pair.
    pub const fn ways(&self) -> u32 {
        if self.low == self.high {
            1
        } else {
            2
        }
    }
}

pub const DICE_TABLE: [DiceRoll; 21] = [
    DiceRoll::new(1, 1, Play(Double)),
    DiceRoll::new(1, 2, Play(Single)),
    DiceRoll::new(1, 3, Play(Single)),
    DiceRoll::new(1, 4, Play(Single)),
    DiceRoll::new(1, 5, Play(BaseOnBalls)),
    DiceRoll::new(1, 6, Play(Error)),
    DiceRoll::new(2, 2, Play(DoublePlay)),
    DiceRoll::new(2, 3, Strike),
    DiceRoll::new(2, 4, Strike),
    DiceRoll::new(2, 5, Strike),
    DiceRoll::new(2, 6, Play(FoulOut)),
    DiceRoll::new(3, 3, Play(BaseOnBalls)),
    DiceRoll::new(3, 4, Play(OutAtFirst)),
    DiceRoll::new(3, 5, Play(OutAtFirst)),
    DiceRoll::new(3, 6, Play(FlyOut)),
    DiceRoll::new(4, 4, Play(Triple)),
    DiceRoll::new(4, 5, Play(FlyOut)),
    DiceRoll::new(4, 6, Play(OutAtFirst)),
    DiceRoll::new(5, 5, Play(Double)),
    DiceRoll::new(5, 6, Play(FlyOut)),
    DiceRoll::new(6, 6, Play(HomeRun)),
];

/// Looks up the result of a roll regardless of die order.
pub fn lookup(a: u8, b: u8) -> Option<DiceRoll> {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    DICE_TABLE
        .iter()
        .copied()
        .find(|roll| roll.low == low && roll.high == high)
}

/// Probability that one roll of the dice is a strike.
pub fn strike_probability() -> f64 {
    let strikes: u32 = DICE_TABLE
        .iter()
        .filter(|roll| roll.result == Strike)
        .map(DiceRoll::ways)
        .sum();
    f64::from(strikes) / f64::from(ROLL_COMBINATIONS)
}

/// Categorical distribution over the outcome alphabet.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeDistribution {
    weights: [f64; Outcome::COUNT],
    index: WeightedIndex<f64>,
}

impl OutcomeDistribution {
    /// Weights in units of "ways out of 36" for a whole plate appearance.
    ///
    /// A non-strike result can follow zero, one or two strike rolls, so its
    /// roll count is scaled by `1 + p + p^2`. The weights sum to 36.
    pub fn from_dice_table() -> Result<Self, SimulationError> {
        let p = strike_probability();
        let before_strikeout: f64 = (0..STRIKES_PER_STRIKEOUT).map(|k| p.powi(k)).sum();

        let mut weights = [0.0; Outcome::COUNT];
        for roll in DICE_TABLE {
            if let Play(outcome) = roll.result {
                weights[outcome.index()] += f64::from(roll.ways()) * before_strikeout;
            }
        }
        weights[Strikeout.index()] = f64::from(ROLL_COMBINATIONS) * p.powi(STRIKES_PER_STRIKEOUT);
        Self::from_weights(weights)
    }

    /// Builds a distribution from raw weights indexed like [`Outcome::ALL`].
    pub fn from_weights(weights: [f64; Outcome::COUNT]) -> Result<Self, SimulationError> {
        let index = WeightedIndex::new(weights.iter())
            .map_err(|e| SimulationError::Distribution(e.to_string()))?;
        Ok(Self { weights, index })
    }

    pub fn weight(&self, outcome: Outcome) -> f64 {
        self.weights[outcome.index()]
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn probability(&self, outcome: Outcome) -> f64 {
        self.weight(outcome) / self.total_weight()
    }

    /// `(outcome, probability)` pairs in alphabet order.
    pub fn probabilities(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        Outcome::ALL
            .into_iter()
            .map(move |outcome| (outcome, self.probability(outcome)))
    }

    /// Endless stream of outcomes drawn with `rng`.
    pub fn source<R: Rng>(&self, rng: R) -> DiceEventSource<'_, R> {
        DiceEventSource {
            rng,
            index: &self.index,
        }
    }
}

/// Pull-based, never-ending outcome stream.
pub struct DiceEventSource<'a, R> {
    rng: R,
    index: &'a WeightedIndex<f64>,
}

impl<R: Rng> Iterator for DiceEventSource<'_, R> {
    type Item = Outcome;

    #[inline]
    fn next(&mut self) -> Option<Outcome> {
        Some(Outcome::ALL[self.index.sample(&mut self.rng)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn table_covers_every_roll_once() {
        let total: u32 = DICE_TABLE.iter().map(DiceRoll::ways).sum();
        assert_eq!(total, ROLL_COMBINATIONS);
        for a in 1..=6 {
            for b in 1..=6 {
                assert!(lookup(a, b).is_some(), "no entry for {a}-{b}");
            }
        }
    }

    #[test]
    fn lookup_ignores_die_order() {
        assert_eq!(lookup(6, 1), lookup(1, 6));
        assert_eq!(lookup(2, 2).unwrap().result, Play(DoublePlay));
        assert_eq!(lookup(7, 1), None);
    }

    #[test]
    fn strikeout_probability_is_cube_of_strike_roll() {
        let p = strike_probability();
        assert!((p - 1.0 / 6.0).abs() < 1e-12);

        let dist = OutcomeDistribution::from_dice_table().unwrap();
        assert!(
            (dist.probability(Strikeout) - p.powi(3)).abs() < 1e-12,
            "p^3 = {}, P(K) = {}",
            p.powi(3),
            dist.probability(Strikeout)
        );
    }

    #[test]
    fn other_results_absorb_strikes_before_them() {
        let p = strike_probability();
        let scale = 1.0 + p + p * p;
        let dist = OutcomeDistribution::from_dice_table().unwrap();

        assert!((dist.total_weight() - 36.0).abs() < 1e-9);
        let roll_counts = [(Single, 6.0), (OutAtFirst, 6.0), (BaseOnBalls, 3.0), (HomeRun, 1.0)];
        for (outcome, ways) in roll_counts {
            let expected = ways * scale / 36.0;
            assert!(
                (dist.probability(outcome) - expected).abs() < 1e-12,
                "{outcome}: expected {expected}, got {}",
                dist.probability(outcome)
            );
        }
        let total: f64 = dist.probabilities().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sampled_strikeout_rate_matches_cube() {
        let dist = OutcomeDistribution::from_dice_table().unwrap();
        let n = 400_000;
        let strikeouts = dist
            .source(SmallRng::seed_from_u64(3))
            .take(n)
            .filter(|&o| o == Strikeout)
            .count();
        let observed = strikeouts as f64 / n as f64;
        assert!((observed - strike_probability().powi(3)).abs() < 0.001);
    }

    #[test]
    fn source_is_reproducible() {
        let dist = OutcomeDistribution::from_dice_table().unwrap();
        let a: Vec<_> = dist.source(SmallRng::seed_from_u64(9)).take(200).collect();
        let b: Vec<_> = dist.source(SmallRng::seed_from_u64(9)).take(200).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn source_frequencies_match_weights() {
        let dist = OutcomeDistribution::from_dice_table().unwrap();
        let n = 200_000;
        let singles = dist
            .source(SmallRng::seed_from_u64(1))
            .take(n)
            .filter(|&o| o == Single)
            .count();
        let observed = singles as f64 / n as f64;
        assert!((observed - dist.probability(Single)).abs() < 0.01);
    }

    #[test]
    fn rejects_all_zero_weights() {
        assert!(OutcomeDistribution::from_weights([0.0; Outcome::COUNT]).is_err());
    }
}
