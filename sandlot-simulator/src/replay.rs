//! Replay module.
//!
//! Plays scripted outcome sequences through the traced inning simulator.
//! Scenario files are YAML:
//!
//! ```yaml
//! scenarios:
//!   - name: runner scores from second
//!     outcomes: "o1o1o"
//!     expected_runs: 1
//! ```
//!
//! Every outcome string is checked when the file is loaded, so a typo fails
//! before anything is played.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use sandlot_core::{parse_sequence, play_inning_traced, Outcome, ParseOutcomeError, SimulationError};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Scenario file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization error: {0}")]
    Serde(#[from] serde_yaml::Error),

    #[error("Scenario '{scenario}' has an invalid outcome: {source}")]
    InvalidOutcome {
        scenario: String,
        #[source]
        source: ParseOutcomeError,
    },

    #[error("Scenario '{scenario}' failed: {source}")]
    Simulation {
        scenario: String,
        #[source]
        source: SimulationError,
    },

    #[error("Scenario file contains no scenarios")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Compact outcome codes, e.g. `"E14o1oK"`.
    pub outcomes: String,
    #[serde(default)]
    pub expected_runs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub scenarios: Vec<Scenario>,
}

/// Outcome of replaying one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub name: String,
    pub outcomes: String,
    pub runs: u32,
    pub plate_appearances: u32,
    pub expected_runs: Option<u32>,
    /// One line per plate appearance: the state before it and the outcome.
    pub trace: Vec<String>,
}

impl ReplayReport {
    /// `true` when no expectation was given or it was met.
    pub fn matches_expectation(&self) -> bool {
        self.expected_runs.map_or(true, |expected| expected == self.runs)
    }
}

impl Scenario {
    pub fn inline(name: impl Into<String>, outcomes: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: outcomes.into(),
            expected_runs: None,
        }
    }

    pub fn parse_outcomes(&self) -> Result<Vec<Outcome>, ScenarioError> {
        parse_sequence(&self.outcomes).map_err(|source| ScenarioError::InvalidOutcome {
            scenario: self.name.clone(),
            source,
        })
    }
}

impl ScenarioFile {
    /// Loads and checks a scenario file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = serde_yaml::from_str(content)?;
        if file.scenarios.is_empty() {
            return Err(ScenarioError::Empty);
        }
        for scenario in &file.scenarios {
            scenario.parse_outcomes()?;
        }
        Ok(file)
    }
}

/// Replays a scenario, recording the state before every plate appearance.
#[instrument(level = "debug", skip(scenario), fields(scenario = %scenario.name))]
pub fn replay(scenario: &Scenario) -> Result<ReplayReport, ScenarioError> {
    let outcomes = scenario.parse_outcomes()?;
    let mut trace = Vec::with_capacity(outcomes.len());
    let report = play_inning_traced(outcomes, |state, outcome| {
        trace.push(format!("{state}: {} ({outcome})", outcome.code()));
    })
    .map_err(|source| ScenarioError::Simulation {
        scenario: scenario.name.clone(),
        source,
    })?;
    debug!(runs = report.runs, "Scenario replayed");

    Ok(ReplayReport {
        name: scenario.name.clone(),
        outcomes: scenario.outcomes.clone(),
        runs: report.runs,
        plate_appearances: report.plate_appearances,
        expected_runs: scenario.expected_runs,
        trace,
    })
}
