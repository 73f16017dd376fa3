//! Run-total statistics.
//!
//! Summarizes a list of run totals (per inning or per game): moments,
//! percentiles and a dense histogram, plus a text rendering of the histogram.

use std::fmt::Write;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatistics {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
    pub median: f64,
    pub percentiles: Percentiles,
    /// Fraction of totals with at least one run.
    pub scoring_rate: f64,
    /// One bin per run total from `min` to `max`.
    pub histogram: Vec<HistogramBin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Percentiles {
    pub p10: u32,
    pub p25: u32,
    pub p50: u32,
    pub p75: u32,
    pub p90: u32,
    pub p99: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub runs: u32,
    pub count: u64,
    pub probability: f64,
}

/// Mean of a list of run totals, `None` when empty.
pub fn mean_runs(runs: &[u32]) -> Option<f64> {
    if runs.is_empty() {
        return None;
    }
    let total: u64 = runs.iter().map(|&r| u64::from(r)).sum();
    Some(total as f64 / runs.len() as f64)
}

/// Run totals counted per value from `min` upward.
struct Tally {
    min: u32,
    counts: Vec<u64>,
}

impl Tally {
    fn new(runs: &[u32]) -> Option<Self> {
        let min = *runs.iter().min()?;
        let max = *runs.iter().max()?;
        let mut counts = vec![0u64; (max - min) as usize + 1];
        for &r in runs {
            counts[(r - min) as usize] += 1;
        }
        Some(Self { min, counts })
    }

    fn values(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(move |(offset, &count)| (self.min + offset as u32, count))
    }

    /// The `rank`-th smallest total, 1-based.
    fn nth(&self, rank: u64) -> u32 {
        let mut seen = 0;
        for (runs, count) in self.values() {
            seen += count;
            if seen >= rank {
                return runs;
            }
        }
        self.min + self.counts.len() as u32 - 1
    }

    /// Nearest-rank percentile.
    fn percentile(&self, n: u64, p: f64) -> u32 {
        let rank = ((p / 100.0) * n as f64).ceil() as u64;
        self.nth(rank.clamp(1, n))
    }
}

impl RunStatistics {
    /// `None` for an empty sample.
    ///
    /// Works from per-value counts, so memory grows with the largest total
    /// rather than with the sample size.
    pub fn from_runs(runs: &[u32]) -> Option<Self> {
        let tally = Tally::new(runs)?;
        let count = runs.len();
        let n = count as u64;
        let nf = count as f64;

        let mean = tally
            .values()
            .map(|(r, c)| f64::from(r) * c as f64)
            .sum::<f64>()
            / nf;
        let variance = tally
            .values()
            .map(|(r, c)| (f64::from(r) - mean).powi(2) * c as f64)
            .sum::<f64>()
            / nf;

        let median = if n % 2 == 0 {
            (f64::from(tally.nth(n / 2)) + f64::from(tally.nth(n / 2 + 1))) / 2.0
        } else {
            f64::from(tally.nth(n / 2 + 1))
        };

        let histogram = tally
            .values()
            .map(|(runs, count)| HistogramBin {
                runs,
                count,
                probability: count as f64 / nf,
            })
            .collect();

        let scoreless = if tally.min == 0 { tally.counts[0] } else { 0 };
        let max = tally.min + tally.counts.len() as u32 - 1;

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min: tally.min,
            max,
            median,
            percentiles: Percentiles {
                p10: tally.percentile(n, 10.0),
                p25: tally.percentile(n, 25.0),
                p50: tally.percentile(n, 50.0),
                p75: tally.percentile(n, 75.0),
                p90: tally.percentile(n, 90.0),
                p99: tally.percentile(n, 99.0),
            },
            scoring_rate: (n - scoreless) as f64 / nf,
            histogram,
        })
    }

    /// Text histogram; the most common total gets a bar `width` characters long.
    pub fn render_histogram(&self, width: usize) -> String {
        let tallest = self.histogram.iter().map(|b| b.count).max().unwrap_or(0);
        let mut out = String::new();
        let _ = writeln!(out, "{:>4}  {:>10}  {:>7}", "runs", "count", "share");
        for bin in &self.histogram {
            let bar = if tallest == 0 {
                0
            } else {
                ((bin.count as f64 / tallest as f64) * width as f64).round() as usize
            };
            let _ = writeln!(
                out,
                "{:>4}  {:>10}  {:>6.2}%  {}",
                bin.runs,
                bin.count,
                bin.probability * 100.0,
                "#".repeat(bar)
            );
        }
        out
    }
}
