//! Metrics Recorder Trait
//!
//! Defines a trait abstraction for metrics recording that supports:
//! - Production: whatever sink the embedding application provides
//! - Tests: in-memory recording for verification

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Trait for recording engine metrics
pub trait MetricsRecorder: Send + Sync + 'static {
    /// Increment a counter by 1
    fn incr(&self, name: &str, tags: &[&str]);

    /// Record a histogram/distribution value
    fn histogram(&self, name: &str, value: f64, tags: &[&str]);

    /// Record one query-set generation with timing and status
    fn record_generation(&self, generator: &str, duration_ms: f64, success: bool) {
        let status = if success { "success" } else { "error" };
        let gen_tag = format!("generator:{}", generator);
        let status_tag = format!("status:{}", status);

        self.histogram("autoquery.generation.duration", duration_ms, &[&gen_tag, &status_tag]);
        self.incr("autoquery.generation.count", &[&gen_tag, &status_tag]);
    }

    /// Record a metric name the engine refused
    fn record_rejection(&self, reason: &str) {
        let reason_tag = format!("reason:{}", reason);
        self.incr("autoquery.rejections", &[&reason_tag]);
    }
}

/// No-op metrics recorder
#[derive(Clone, Default)]
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {
    #[inline]
    fn incr(&self, _name: &str, _tags: &[&str]) {}
    #[inline]
    fn histogram(&self, _name: &str, _value: f64, _tags: &[&str]) {}
}

/// Recorded metric for testing
#[derive(Debug, Clone)]
pub struct RecordedMetric {
    pub name: String,
    pub value: f64,
    pub tags: Vec<String>,
    pub metric_type: MetricType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// In-memory recorder - keeps every metric for later assertions
#[derive(Default)]
pub struct SimulatedMetrics {
    recorded: Mutex<Vec<RecordedMetric>>,
    generation_count: AtomicU64,
    rejection_count: AtomicU64,
}

impl SimulatedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_recorded(&self) -> Vec<RecordedMetric> {
        self.recorded.lock().clone()
    }

    pub fn get_by_name(&self, name: &str) -> Vec<RecordedMetric> {
        self.recorded
            .lock()
            .iter()
            .filter(|m| m.name == name)
            .cloned()
            .collect()
    }

    pub fn generation_count(&self) -> u64 {
        self.generation_count.load(Ordering::SeqCst)
    }

    pub fn rejection_count(&self) -> u64 {
        self.rejection_count.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.recorded.lock().clear();
        self.generation_count.store(0, Ordering::SeqCst);
        self.rejection_count.store(0, Ordering::SeqCst);
    }

    /// True if a metric with this name and type was recorded
    pub fn assert_metric(&self, name: &str, metric_type: MetricType) -> bool {
        self.recorded
            .lock()
            .iter()
            .any(|m| m.name == name && m.metric_type == metric_type)
    }

    fn push(&self, name: &str, value: f64, tags: &[&str], metric_type: MetricType) {
        self.recorded.lock().push(RecordedMetric {
            name: name.to_string(),
            value,
            tags: tags.iter().map(|s| s.to_string()).collect(),
            metric_type,
        });
    }
}

impl MetricsRecorder for SimulatedMetrics {
    fn incr(&self, name: &str, tags: &[&str]) {
        self.push(name, 1.0, tags, MetricType::Counter);
    }

    fn histogram(&self, name: &str, value: f64, tags: &[&str]) {
        self.push(name, value, tags, MetricType::Histogram);
    }

    fn record_generation(&self, generator: &str, duration_ms: f64, success: bool) {
        self.generation_count.fetch_add(1, Ordering::SeqCst);

        let status = if success { "success" } else { "error" };
        let gen_tag = format!("generator:{}", generator);
        let status_tag = format!("status:{}", status);

        self.histogram("autoquery.generation.duration", duration_ms, &[&gen_tag, &status_tag]);
        self.incr("autoquery.generation.count", &[&gen_tag, &status_tag]);
    }

    fn record_rejection(&self, reason: &str) {
        self.rejection_count.fetch_add(1, Ordering::SeqCst);
        let reason_tag = format!("reason:{}", reason);
        self.incr("autoquery.rejections", &[&reason_tag]);
    }
}

/// Arc wrapper for trait object usage
pub type SharedMetrics = Arc<dyn MetricsRecorder>;

pub fn noop_metrics() -> SharedMetrics {
    Arc::new(NoopMetrics)
}

pub fn simulated_metrics() -> Arc<SimulatedMetrics> {
    Arc::new(SimulatedMetrics::new())
}
