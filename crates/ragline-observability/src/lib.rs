//! # ragline-observability
//!
//! Structured tracing with span definitions and event helpers, `tracing`-backed
//! implementations of the `Telemetry` and `TraceSink` collaborators, and
//! degradation event tracking.
//!
//! ## Architecture
//!
//! ```text
//! ragline-observability
//! ├── tracing_setup
//! │   ├── init_tracing (RAGLINE_LOG, JSON)
//! │   ├── spans (search, branch, cache, rerank)
//! │   └── events (structured log events)
//! ├── telemetry
//! │   ├── TracingTelemetry
//! │   └── NoopTelemetry
//! ├── trace_sink
//! │   ├── TracingTraceSink
//! │   └── BufferedTraceSink
//! └── degradation
//!     └── DegradationTracker (recovery status)
//! ```

pub mod degradation;
pub mod telemetry;
pub mod trace_sink;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use telemetry::{NoopTelemetry, TracingTelemetry};
pub use trace_sink::{BufferedTraceSink, TracingTraceSink};
