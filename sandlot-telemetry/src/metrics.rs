//! ## sandlot-telemetry::metrics
//! **Prometheus counters and histograms for simulation batches**

use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub innings_simulated: Counter,
    pub runs_per_inning: Histogram,
    pub batch_duration: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let innings_simulated =
            Counter::new("sandlot_innings_total", "Total simulated half-innings")?;

        let runs_per_inning = Histogram::with_opts(
            HistogramOpts::new("sandlot_runs_per_inning", "Runs scored per half-inning")
                .buckets(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 10.0]),
        )?;

        let batch_duration = Histogram::with_opts(
            HistogramOpts::new(
                "sandlot_batch_duration_seconds",
                "Wall-clock time of a Monte Carlo batch",
            )
            .buckets(vec![0.01, 0.1, 1.0, 10.0, 60.0]),
        )?;

        registry.register(Box::new(innings_simulated.clone()))?;
        registry.register(Box::new(runs_per_inning.clone()))?;
        registry.register(Box::new(batch_duration.clone()))?;

        Ok(Self {
            registry,
            innings_simulated,
            runs_per_inning,
            batch_duration,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Records a finished batch of half-innings.
    pub fn record_innings(&self, runs: &[u32]) {
        self.innings_simulated.inc_by(runs.len() as f64);
        for &r in runs {
            self.runs_per_inning.observe(f64::from(r));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_innings() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.record_innings(&[0, 0, 3, 1]);
        assert_eq!(metrics.innings_simulated.get(), 4.0);
        assert_eq!(metrics.runs_per_inning.get_sample_count(), 4);
        assert_eq!(metrics.runs_per_inning.get_sample_sum(), 4.0);
    }

    #[test]
    fn gathers_text_format() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.batch_duration.observe(0.5);
        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("sandlot_innings_total"));
        assert!(text.contains("sandlot_batch_duration_seconds_count 1"));
    }
}
