//! Custom validation functions for configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static LOG_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_:\-]+(=(trace|debug|info|warn|error|off))?|trace|debug|info|warn|error|off)$")
        .expect("log directive pattern is valid")
});

/// Validate a comma-separated list of `tracing` filter directives.
pub fn validate_log_filter(filter: &str) -> Result<(), ValidationError> {
    let valid = !filter.trim().is_empty()
        && filter
            .split(',')
            .map(str::trim)
            .all(|directive| LOG_DIRECTIVE.is_match(directive));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_filter"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filters() {
        assert!(validate_log_filter("info").is_ok());
        assert!(validate_log_filter("warn,sandlot_core=trace").is_ok());
        assert!(validate_log_filter("").is_err());
        assert!(validate_log_filter("sandlot=shout").is_err());
    }
}
