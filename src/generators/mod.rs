//! Query Generators
//!
//! Splits a metric name into parts and routes it to the generator its last
//! segment selects:
//!
//! - `..._sum` -> [`sum`]
//! - `..._bucket` -> [`bucket`]
//! - anything else -> [`general`]

pub mod bucket;
pub mod general;
pub mod sum;

use crate::error::Result;
use crate::queries::QueryDefinitionSet;
use crate::rules::Suffix;
use std::fmt;

/// Default segment separator for metric names
pub const DEFAULT_DELIMITER: &str = "_";

/// Ordered segments of a metric name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricNameParts<'a> {
    parts: Vec<&'a str>,
    delimiter: &'a str,
}

impl<'a> MetricNameParts<'a> {
    /// Split `metric` on `delimiter`. An empty name yields one empty part.
    pub fn split(metric: &'a str, delimiter: &'a str) -> Self {
        MetricNameParts {
            parts: metric.split(delimiter).collect(),
            delimiter,
        }
    }

    /// Last segment, the suffix
    pub fn last(&self) -> Option<&'a str> {
        self.parts.last().copied()
    }

    /// Segment `n` places before the last one (`0` is the last)
    pub fn from_end(&self, n: usize) -> Option<&'a str> {
        self.parts
            .len()
            .checked_sub(n + 1)
            .map(|idx| self.parts[idx])
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl<'a> From<Vec<&'a str>> for MetricNameParts<'a> {
    fn from(parts: Vec<&'a str>) -> Self {
        MetricNameParts {
            parts,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl fmt::Display for MetricNameParts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join(self.delimiter))
    }
}

/// Generator selected by a metric's last segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    General,
    Sum,
    Bucket,
}

impl GeneratorKind {
    pub fn for_parts(parts: &MetricNameParts<'_>) -> Self {
        match parts.last().and_then(Suffix::classify) {
            Some(Suffix::Sum) => GeneratorKind::Sum,
            Some(Suffix::Bucket) => GeneratorKind::Bucket,
            _ => GeneratorKind::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::General => "general",
            GeneratorKind::Sum => "sum",
            GeneratorKind::Bucket => "bucket",
        }
    }

    pub fn generate(&self, parts: &MetricNameParts<'_>) -> Result<QueryDefinitionSet> {
        match self {
            GeneratorKind::General => general::generator(parts),
            GeneratorKind::Sum => sum::generator(parts),
            GeneratorKind::Bucket => bucket::generator(parts),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the query set for `metric` split on `delimiter`
pub fn queries_for_metric(metric: &str, delimiter: &str) -> Result<QueryDefinitionSet> {
    let parts = MetricNameParts::split(metric, delimiter);
    GeneratorKind::for_parts(&parts).generate(&parts)
}

/// Derive the query set for a `_`-delimited metric name
pub fn get_auto_queries_for_metric(metric: &str) -> Result<QueryDefinitionSet> {
    queries_for_metric(metric, DEFAULT_DELIMITER)
}
