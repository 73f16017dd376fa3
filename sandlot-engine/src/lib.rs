//! ## sandlot-engine
//! **Runtime shared by every frontend**
//!
//! ### Expectations:
//! - Monte Carlo batches run on a dedicated rayon pool off the async executor
//! - Digest mismatches leave a report on disk before failing
//! - Every completed batch, sweep and replay emits one structured event

pub mod diagnostics;
pub mod error;
pub mod runtime;

pub use diagnostics::{DiagnosticsCollector, MismatchReport};
pub use error::EngineError;
pub use runtime::{SimulationReport, SimulationRuntime, SweepEntry};
