//! # Sandlot Configuration System
//!
//! Hierarchical configuration for the dice-baseball simulator.
//!
//! ## Features
//! - **Unified Configuration**: One file drives the simulator, reports and telemetry
//! - **Validation**: Runtime validation of every numeric bound and log filter
//! - **Environment Awareness**: Per-environment override files and `SANDLOT_*` variables

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod error;
mod report;
mod simulator;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use report::ReportConfig;
pub use simulator::SimulatorConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/sandlot.yaml";
const ENV_PREFIX: &str = "SANDLOT_";

/// Top‑level configuration container for all Sandlot components.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq, Eq)]
pub struct SandlotConfig {
    /// Monte Carlo parameters (seed, trial count, game length, threads).
    #[validate(nested)]
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Statistics report rendering.
    #[validate(nested)]
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl SandlotConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/sandlot.yaml` - Base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - Environment‑specific overrides (`SANDLOT_ENV`, default `development`).
    /// 4. `SANDLOT_*` environment variables, `__` separating nested keys.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(SandlotConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        } else {
            debug!("{} not found, using default configuration", BASE_FILE);
        }

        let env = std::env::var("SANDLOT_ENV").unwrap_or_else(|_| "development".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file layered over the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::extract(
            Figment::from(Serialized::defaults(SandlotConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Explicit file when given, otherwise the default hierarchy.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn full_config_validation() {
        let config = SandlotConfig::default();
        config.validate().expect("Default config should validate");
        assert_eq!(config.simulator.innings_per_game, 9);
        assert_eq!(config.telemetry.log_filter, "info");
    }

    #[test]
    fn defaults_without_files() {
        Jail::expect_with(|_jail| {
            let config = SandlotConfig::load().expect("defaults load");
            assert_eq!(config, SandlotConfig::default());
            Ok(())
        });
    }

    #[test]
    fn base_file_and_environment_override() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/sandlot.yaml",
                r#"
simulator:
  seed: 7
  innings: 5000
report:
  histogram_width: 30
"#,
            )?;
            jail.create_file("config/ci.yaml", "simulator:\n  threads: 2\n")?;
            jail.set_env("SANDLOT_ENV", "ci");
            jail.set_env("SANDLOT_SIMULATOR__INNINGS", "900");

            let config = SandlotConfig::load().expect("layered load");
            assert_eq!(config.simulator.seed, 7);
            assert_eq!(config.simulator.innings, 900);
            assert_eq!(config.simulator.threads, Some(2));
            assert_eq!(config.simulator.innings_per_game, 9);
            assert_eq!(config.report.histogram_width, 30);
            Ok(())
        });
    }

    #[test]
    fn load_from_path_validates() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "simulator:\n  innings_per_game: 0\n")?;
            let err = SandlotConfig::load_from_path("bad.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            assert!(err.to_string().contains("simulator.innings_per_game"));
            Ok(())
        });
    }

    #[test]
    fn innings_are_bounded() {
        let mut config = SandlotConfig::default();
        config.simulator.innings = 100_000_000;
        assert!(config.validate().is_ok());

        config.simulator.innings = 100_000_001;
        let err = ConfigError::from(config.validate().unwrap_err());
        assert!(err.to_string().contains("simulator.innings"));
    }

    #[test]
    fn bad_log_filter_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("noisy.yaml", "telemetry:\n  log_filter: \"sandlot=shout\"\n")?;
            let err = SandlotConfig::load_from_path("noisy.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            Ok(())
        });
    }

    #[test]
    fn missing_file() {
        let err = SandlotConfig::load_from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn effective_threads_prefers_explicit_value() {
        let mut config = SimulatorConfig::default();
        config.threads = Some(3);
        assert_eq!(config.effective_threads(), 3);
        config.threads = None;
        assert!(config.effective_threads() >= 1);
    }
}
