//! ## sandlot-telemetry::logging
//! **Structured logging with tracing and OpenTelemetry attributes**
//!
//! ### Expectations:
//! - Silent hot path: per-play events are TRACE and filtered out by default
//! - One structured event per completed batch or replay

use opentelemetry::KeyValue;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
    ///
    /// Returns `false` when a subscriber was already installed.
    pub fn init(default_filter: &str) -> bool {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_filter)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .is_ok()
    }

    /// Emits one INFO event named after `event_type`, with the attributes
    /// rendered as `key=value` pairs in insertion order.
    pub async fn log_event(event_type: &str, attributes: Vec<KeyValue>) {
        let span = info_span!("sandlot", event = event_type);
        let rendered = render_attributes(&attributes);

        async {
            info!(
                attributes = %rendered,
                attribute_count = attributes.len(),
                "{event_type}"
            );
        }
        .instrument(span)
        .await
    }
}

fn render_attributes(attributes: &[KeyValue]) -> String {
    attributes
        .iter()
        .map(|kv| format!("{}={}", kv.key.as_str(), kv.value.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}
