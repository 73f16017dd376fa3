use thiserror::Error;
use tokio::task::JoinError;

use sandlot_config::ConfigError;
use sandlot_core::SimulationError;
use sandlot_simulator::ScenarioError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Simulation task failed: {0}")]
    Join(String),

    #[error("Run digest mismatch: expected {expected}, got {actual} (report: {report})")]
    DigestMismatch {
        expected: String,
        actual: String,
        report: String,
    },

    #[error("Nothing to simulate: {0}")]
    EmptyBatch(String),
}

impl From<JoinError> for EngineError {
    fn from(err: JoinError) -> Self {
        EngineError::Join(err.to_string())
    }
}
