//! Simulation runtime core - coordinates configuration, Monte Carlo batches,
//! scenario replay, diagnostics and telemetry for every frontend.

use std::path::Path;
use std::sync::Arc;

use opentelemetry::KeyValue;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, instrument, warn};

use sandlot_config::SandlotConfig;
use sandlot_simulator::{
    mean_runs, replay, run_batch, BatchResult, BatchSpec, OutcomeDistribution, ReplayReport,
    RunStatistics, ScenarioFile,
};
use sandlot_telemetry::{EventLogger, MetricsRecorder};

use crate::diagnostics::{DiagnosticsCollector, MismatchReport};
use crate::error::EngineError;

/// Statistics of one Monte Carlo batch, as printed and written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub innings: usize,
    pub innings_per_game: usize,
    pub threads: usize,
    pub digest: String,
    pub plate_appearances: u64,
    pub elapsed_ms: u64,
    pub per_inning: RunStatistics,
    /// `None` when fewer innings than one game were played.
    pub per_game: Option<RunStatistics>,
}

/// One seed of a seed sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepEntry {
    pub seed: u64,
    pub digest: String,
    pub mean_runs_per_inning: f64,
    pub mean_runs_per_game: Option<f64>,
}

/// Coordinates simulator runs with shared configuration, metrics and diagnostics.
pub struct SimulationRuntime {
    /// Validated configuration
    config: Arc<SandlotConfig>,
    /// Weighted outcome distribution shared by every batch
    distribution: Arc<OutcomeDistribution>,
    /// Metrics collection subsystem
    pub metrics: Arc<MetricsRecorder>,
    /// Diagnostic data collector
    diagnostics: Mutex<DiagnosticsCollector>,
}

impl SimulationRuntime {
    pub fn new(config: SandlotConfig, metrics: MetricsRecorder) -> Result<Self, EngineError> {
        info!("Initializing simulation runtime");
        debug!("Simulator config: {:?}", config.simulator);

        let report_dir = config
            .report
            .output
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            config: Arc::new(config),
            distribution: Arc::new(OutcomeDistribution::from_dice_table()?),
            metrics: Arc::new(metrics),
            diagnostics: Mutex::new(DiagnosticsCollector::new(report_dir)),
        })
    }

    pub fn config(&self) -> &SandlotConfig {
        &self.config
    }

    pub fn distribution(&self) -> &OutcomeDistribution {
        &self.distribution
    }

    /// Runs the configured batch, optionally checking its digest.
    ///
    /// A digest mismatch writes a mismatch report and fails.
    #[instrument(skip(self))]
    pub async fn run_simulation(
        &self,
        validate_hash: Option<&str>,
    ) -> Result<SimulationReport, EngineError> {
        let seed = self.config.simulator.seed;
        let batch = self.execute_batch(seed).await?;
        if let Some(expected) = validate_hash {
            self.check_digest(&batch, expected)?;
        }
        let report = self.summarize(&batch)?;

        EventLogger::log_event(
            "simulation_complete",
            vec![
                KeyValue::new("seed", seed.to_string()),
                KeyValue::new("innings", report.innings.to_string()),
                KeyValue::new("mean_runs_per_inning", format!("{:.4}", report.per_inning.mean)),
                KeyValue::new("final_hash", report.digest.clone()),
            ],
        )
        .await;

        if let Some(path) = &self.config.report.output {
            std::fs::write(path, serde_yaml::to_string(&report)?)?;
            info!("Statistics written to {}", path.display());
        }

        Ok(report)
    }

    /// Runs one batch per seed starting at `first_seed`.
    ///
    /// Seeds already seen by this runtime must reproduce their earlier digest.
    #[instrument(skip(self))]
    pub async fn run_sweep(
        &self,
        first_seed: u64,
        seeds: u64,
    ) -> Result<Vec<SweepEntry>, EngineError> {
        let mut entries = Vec::new();
        for seed in first_seed..first_seed.saturating_add(seeds) {
            let batch = self.execute_batch(seed).await?;

            let known = self.diagnostics.lock().batch_digest(seed).map(str::to_owned);
            if let Some(expected) = known {
                self.check_digest(&batch, &expected)?;
            }
            self.diagnostics
                .lock()
                .record_batch_digest(seed, &batch.digest);

            let per_inning = mean_runs(&batch.inning_runs)
                .ok_or_else(|| EngineError::EmptyBatch(format!("seed {seed}")))?;
            let per_game = mean_runs(&batch.game_runs);
            debug!(seed, mean = per_inning, "Sweep seed complete");

            entries.push(SweepEntry {
                seed,
                digest: batch.digest,
                mean_runs_per_inning: per_inning,
                mean_runs_per_game: per_game,
            });
        }

        EventLogger::log_event(
            "sweep_complete",
            vec![
                KeyValue::new("first_seed", first_seed.to_string()),
                KeyValue::new("seeds", entries.len().to_string()),
            ],
        )
        .await;
        Ok(entries)
    }

    /// Replays every scenario in a file.
    #[instrument(skip(self, scenarios))]
    pub async fn run_replay(
        &self,
        scenarios: &ScenarioFile,
    ) -> Result<Vec<ReplayReport>, EngineError> {
        let mut reports = Vec::with_capacity(scenarios.scenarios.len());
        for scenario in &scenarios.scenarios {
            let report = replay(scenario)?;
            if !report.matches_expectation() {
                warn!(
                    scenario = %report.name,
                    runs = report.runs,
                    expected = ?report.expected_runs,
                    "Scenario did not meet its expected run count"
                );
            }
            reports.push(report);
        }

        EventLogger::log_event(
            "replay_complete",
            vec![
                KeyValue::new("scenarios", reports.len().to_string()),
                KeyValue::new(
                    "mismatched",
                    reports
                        .iter()
                        .filter(|r| !r.matches_expectation())
                        .count()
                        .to_string(),
                ),
            ],
        )
        .await;
        Ok(reports)
    }

    /// Runs the CPU-bound batch on a blocking thread inside its own rayon pool.
    async fn execute_batch(&self, seed: u64) -> Result<BatchResult, EngineError> {
        let sim = &self.config.simulator;
        let spec = BatchSpec {
            seed,
            innings: sim.innings,
            innings_per_game: sim.innings_per_game,
        };
        let threads = sim.effective_threads();
        let distribution = self.distribution.clone();

        info!(seed, innings = spec.innings, threads, "Starting batch");
        let batch = spawn_blocking(move || -> Result<BatchResult, EngineError> {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("sandlot-worker-{i}"))
                .build()?;
            Ok(pool.install(|| run_batch(&distribution, spec))?)
        })
        .await??;

        self.metrics.record_innings(&batch.inning_runs);
        self.metrics
            .batch_duration
            .observe(batch.elapsed.as_secs_f64());
        Ok(batch)
    }

    fn summarize(&self, batch: &BatchResult) -> Result<SimulationReport, EngineError> {
        let per_inning = RunStatistics::from_runs(&batch.inning_runs)
            .ok_or_else(|| EngineError::EmptyBatch(format!("seed {}", batch.spec.seed)))?;
        Ok(SimulationReport {
            seed: batch.spec.seed,
            innings: batch.spec.innings,
            innings_per_game: batch.spec.innings_per_game,
            threads: self.config.simulator.effective_threads(),
            digest: batch.digest.clone(),
            plate_appearances: batch.plate_appearances,
            elapsed_ms: batch.elapsed.as_millis() as u64,
            per_inning,
            per_game: RunStatistics::from_runs(&batch.game_runs),
        })
    }

    fn check_digest(&self, batch: &BatchResult, expected: &str) -> Result<(), EngineError> {
        if batch.digest == expected {
            return Ok(());
        }
        error!(expected, actual = %batch.digest, "Run digest mismatch");
        let mismatch = MismatchReport::new(
            batch.spec.seed,
            batch.spec.innings,
            self.config.simulator.effective_threads(),
            expected,
            &batch.digest,
        );
        let path = self.diagnostics.lock().record_mismatch(&mismatch)?;
        Err(EngineError::DigestMismatch {
            expected: expected.to_string(),
            actual: batch.digest.clone(),
            report: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandlot_simulator::Scenario;

    fn small_config(innings: usize) -> SandlotConfig {
        let mut config = SandlotConfig::default();
        config.simulator.innings = innings;
        config.simulator.threads = Some(2);
        config
    }

    fn runtime(config: SandlotConfig) -> SimulationRuntime {
        SimulationRuntime::new(config, MetricsRecorder::new().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn simulation_reports_statistics() {
        let runtime = runtime(small_config(900));
        let report = runtime.run_simulation(None).await.unwrap();
        assert_eq!(report.innings, 900);
        assert_eq!(report.per_inning.count, 900);
        assert_eq!(report.per_game.as_ref().map(|g| g.count), Some(100));
        assert!(report.plate_appearances >= 2_700);
        assert_eq!(runtime.metrics.innings_simulated.get(), 900.0);
    }

    #[tokio::test]
    async fn validate_hash_accepts_reproduced_digest() {
        let first = runtime(small_config(300)).run_simulation(None).await.unwrap();
        let second = runtime(small_config(300))
            .run_simulation(Some(&first.digest))
            .await
            .unwrap();
        assert_eq!(first.digest, second.digest);
    }

    #[tokio::test]
    async fn validate_hash_rejects_wrong_digest() {
        let dir = std::env::temp_dir().join(format!("sandlot-runtime-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut config = small_config(100);
        config.report.output = Some(dir.join("stats.yaml"));

        let err = runtime(config)
            .run_simulation(Some("not-a-digest"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::DigestMismatch { .. }));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn writes_report_file() {
        let dir = std::env::temp_dir().join(format!("sandlot-report-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("stats.yaml");
        let mut config = small_config(90);
        config.report.output = Some(output.clone());

        runtime(config).run_simulation(None).await.unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("per_inning:"));
        assert!(written.contains("digest:"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn sweep_runs_each_seed() {
        let runtime = runtime(small_config(180));
        let entries = runtime.run_sweep(10, 3).await.unwrap();
        let seeds: Vec<u64> = entries.iter().map(|e| e.seed).collect();
        assert_eq!(seeds, vec![10, 11, 12]);
        assert!(entries.iter().all(|e| e.mean_runs_per_game.is_some()));

        // Re-running a seed checks it against the recorded digest.
        let again = runtime.run_sweep(11, 1).await.unwrap();
        assert_eq!(again[0].digest, entries[1].digest);
    }

    #[tokio::test]
    async fn sweep_means_match_full_report() {
        let mut config = small_config(270);
        config.simulator.seed = 5;
        let report = runtime(config.clone()).run_simulation(None).await.unwrap();
        let entries = runtime(config).run_sweep(5, 1).await.unwrap();

        assert_eq!(entries[0].digest, report.digest);
        assert!((entries[0].mean_runs_per_inning - report.per_inning.mean).abs() < 1e-9);
        let game_mean = report.per_game.map(|g| g.mean).unwrap();
        assert!((entries[0].mean_runs_per_game.unwrap() - game_mean).abs() < 1e-9);
    }

    #[tokio::test]
    async fn replay_flags_mismatches() {
        let mut wrong = Scenario::inline("wrong", "KKK");
        wrong.expected_runs = Some(1);
        let scenarios = ScenarioFile {
            scenarios: vec![Scenario::inline("walks", "BBBBKKK"), wrong],
        };

        let reports = runtime(small_config(9)).run_replay(&scenarios).await.unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].runs, 1);
        assert!(!reports[1].matches_expectation());
    }
}
