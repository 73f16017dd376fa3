use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::Serialize;

use crate::error::EngineError;

/// Written when a batch does not reproduce the digest it was checked against.
#[derive(Debug, Clone, Serialize)]
pub struct MismatchReport {
    pub recorded_at: String,
    pub seed: u64,
    pub innings: usize,
    pub threads: usize,
    pub expected_digest: String,
    pub actual_digest: String,
}

impl MismatchReport {
    pub fn new(seed: u64, innings: usize, threads: usize, expected: &str, actual: &str) -> Self {
        Self {
            recorded_at: Utc::now().to_rfc3339(),
            seed,
            innings,
            threads,
            expected_digest: expected.to_string(),
            actual_digest: actual.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    report_dir: PathBuf,
    mismatch_reports: Vec<PathBuf>,
    batch_digests: HashMap<u64, String>,
}

impl DiagnosticsCollector {
    pub fn new<P: AsRef<Path>>(report_dir: P) -> Self {
        Self {
            report_dir: report_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn record_mismatch(&mut self, report: &MismatchReport) -> Result<PathBuf, EngineError> {
        let filename = format!(
            "digest_mismatch_{}_{}.yaml",
            report.seed,
            Utc::now().format("%Y%m%dT%H%M%S%.3f")
        );
        let path = self.report_dir.join(filename);
        fs::write(&path, serde_yaml::to_string(report)?)?;

        self.mismatch_reports.push(path.clone());
        Ok(path)
    }

    pub fn record_batch_digest(&mut self, seed: u64, digest: &str) {
        self.batch_digests.insert(seed, digest.to_string());
    }

    pub fn batch_digest(&self, seed: u64) -> Option<&str> {
        self.batch_digests.get(&seed).map(String::as_str)
    }

    pub fn mismatch_reports(&self) -> &[PathBuf] {
        &self.mismatch_reports
    }
}
