//! Observability
//!
//! - Structured logging via `tracing` ([`init_tracing`])
//! - Spans around query generation
//! - A [`MetricsRecorder`] seam so embedders can count generations and
//!   rejections

pub mod recorder;
pub mod spans;
pub mod tracing_setup;

pub use recorder::{
    noop_metrics, simulated_metrics, MetricType, MetricsRecorder, NoopMetrics, RecordedMetric,
    SharedMetrics, SimulatedMetrics,
};
pub use spans::generation_span;
pub use tracing_setup::init as init_tracing;
