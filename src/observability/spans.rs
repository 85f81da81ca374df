//! Span helpers for query generation

use tracing::{span, Level, Span};

/// Span covering one metric's dispatch
#[inline]
pub fn generation_span(metric: &str, generator: &str) -> Span {
    span!(
        Level::DEBUG,
        "autoquery.generate",
        metric.name = %metric,
        generator = %generator
    )
}
