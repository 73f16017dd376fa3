//! Report rendering configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Width in characters of the longest histogram bar.
    #[serde(default = "default_histogram_width")]
    #[validate(range(min = 10, max = 200))]
    pub histogram_width: usize,

    /// Optional YAML file the statistics are written to.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_histogram_width() -> usize {
    50
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            histogram_width: default_histogram_width(),
            output: None,
        }
    }
}
