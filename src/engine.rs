//! Auto-query engine
//!
//! Wraps dispatch with a configured delimiter, logging and metrics.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::generators::{GeneratorKind, MetricNameParts};
use crate::observability::{generation_span, noop_metrics, SharedMetrics};
use crate::queries::QueryDefinitionSet;
use std::time::Instant;

pub struct AutoQueryEngine {
    config: EngineConfig,
    metrics: SharedMetrics,
}

impl Default for AutoQueryEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AutoQueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        AutoQueryEngine {
            config,
            metrics: noop_metrics(),
        }
    }

    pub fn with_metrics(mut self, metrics: SharedMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Derive the query set for one metric name
    pub fn queries_for_metric(&self, metric: &str) -> Result<QueryDefinitionSet> {
        let parts = MetricNameParts::split(metric, &self.config.delimiter);
        let kind = GeneratorKind::for_parts(&parts);
        let _guard = generation_span(metric, kind.as_str()).entered();

        let start = Instant::now();
        let result = kind.generate(&parts);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        self.metrics
            .record_generation(kind.as_str(), elapsed_ms, result.is_ok());

        match &result {
            Ok(set) => {
                tracing::debug!(
                    metric,
                    generator = %kind,
                    unit = %set.main.unit,
                    queries = set.main.queries.len(),
                    variants = set.variants.len(),
                    "generated queries"
                );
            }
            Err(e) => {
                self.metrics.record_rejection(e.reason());
                tracing::warn!(metric, generator = %kind, error = %e, "metric rejected");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoQueryError;
    use crate::observability::simulated_metrics;
    use crate::rules::Unit;

    #[test]
    fn test_default_engine_matches_free_function() {
        let engine = AutoQueryEngine::default();
        for metric in ["my_metric_count", "my_metric_seconds_sum", "my_metric_bucket"] {
            assert_eq!(
                engine.queries_for_metric(metric).unwrap(),
                crate::get_auto_queries_for_metric(metric).unwrap()
            );
        }
    }

    #[test]
    fn test_configured_delimiter() {
        let engine = AutoQueryEngine::new(EngineConfig::default().with_delimiter("."));
        let set = engine.queries_for_metric("http.request.duration.seconds.bucket").unwrap();
        assert_eq!(set.main.unit, Unit::Seconds);
        assert_eq!(set.main.queries.len(), 3);
    }

    #[test]
    fn test_records_generations_and_rejections() {
        let metrics = simulated_metrics();
        let engine = AutoQueryEngine::default().with_metrics(metrics.clone());

        engine.queries_for_metric("my_metric_total").unwrap();
        engine.queries_for_metric("my_metric_bucket").unwrap();
        let err = engine.queries_for_metric("my_metric_").unwrap_err();

        assert!(matches!(err, AutoQueryError::InvalidSuffix { .. }));
        assert_eq!(metrics.generation_count(), 3);
        assert_eq!(metrics.rejection_count(), 1);

        let rejections = metrics.get_by_name("autoquery.rejections");
        assert_eq!(rejections[0].tags, vec!["reason:invalid_suffix"]);

        let counts = metrics.get_by_name("autoquery.generation.count");
        assert!(counts[1].tags.contains(&"generator:bucket".to_string()));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_sync() {
        assert_send_sync::<AutoQueryEngine>();
    }

    #[test]
    fn test_concurrent_callers_share_engine() {
        const THREADS: usize = 8;
        const ROUNDS: usize = 50;
        let names = ["my_metric_count", "my_metric_seconds_sum", "my_metric_seconds_bucket"];

        let metrics = simulated_metrics();
        let engine = AutoQueryEngine::default().with_metrics(metrics.clone());
        let expected: Vec<_> = names
            .iter()
            .map(|name| crate::get_auto_queries_for_metric(name).unwrap())
            .collect();

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..ROUNDS {
                        for (name, want) in names.iter().zip(&expected) {
                            assert_eq!(&engine.queries_for_metric(name).unwrap(), want);
                        }
                        assert!(engine.queries_for_metric("my_metric_").is_err());
                    }
                });
            }
        });

        let per_thread = ROUNDS * (names.len() + 1);
        assert_eq!(metrics.generation_count(), (THREADS * per_thread) as u64);
        assert_eq!(metrics.rejection_count(), (THREADS * ROUNDS) as u64);
        assert_eq!(engine.config().delimiter, "_");
    }
}
