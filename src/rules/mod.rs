//! Suffix Rules
//!
//! Classifies the trailing segment of a metric name and resolves the
//! aggregation, rate and display unit used to build its queries.
//!
//! | Suffix | Aggregation | Rate | Unit |
//! |--------|-------------|------|------|
//! | `count`, `total` | sum | yes | `short` |
//! | `seconds` | avg | no | `s` |
//! | `bytes` | avg | no | `bytes` |
//! | anything else | avg | no | `short` |
//!
//! `sum` and `bucket` are reserved: each picks a dedicated generator.
//! `sum` is rejected here because the sum generator consumes it; `bucket`
//! falls through to the default rule.

use crate::error::{AutoQueryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified metric-name suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix<'a> {
    Count,
    Total,
    Sum,
    Bucket,
    Seconds,
    Bytes,
    Other(&'a str),
}

impl<'a> Suffix<'a> {
    /// Classify a token. Empty tokens do not classify.
    pub fn classify(token: &'a str) -> Option<Self> {
        let suffix = match token {
            "" => return None,
            "count" => Suffix::Count,
            "total" => Suffix::Total,
            "sum" => Suffix::Sum,
            "bucket" => Suffix::Bucket,
            "seconds" => Suffix::Seconds,
            "bytes" => Suffix::Bytes,
            other => Suffix::Other(other),
        };
        Some(suffix)
    }

    /// Reserved suffixes select a generator rather than a rule
    pub fn is_reserved(&self) -> bool {
        matches!(self, Suffix::Sum | Suffix::Bucket)
    }
}

/// Aggregation applied across series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Avg,
}

impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Avg => "avg",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display unit attached to generated queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "s")]
    Seconds,
    #[serde(rename = "bytes")]
    Bytes,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Short => "short",
            Unit::Seconds => "s",
            Unit::Bytes => "bytes",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters driving the generic query builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorParameters {
    pub aggregation: Aggregation,
    pub use_rate: bool,
    pub unit: Unit,
}

impl GeneratorParameters {
    pub const fn new(aggregation: Aggregation, use_rate: bool, unit: Unit) -> Self {
        GeneratorParameters {
            aggregation,
            use_rate,
            unit,
        }
    }

    /// Force rate-of-change semantics
    pub fn with_rate(mut self) -> Self {
        self.use_rate = true;
        self
    }

    /// Replace the display unit
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }
}

const COUNTER: GeneratorParameters = GeneratorParameters::new(Aggregation::Sum, true, Unit::Short);
const GAUGE: GeneratorParameters = GeneratorParameters::new(Aggregation::Avg, false, Unit::Short);

/// Resolve generator parameters for a suffix.
///
/// Fails with [`AutoQueryError::InvalidSuffix`] when the suffix is absent,
/// empty, or `sum`.
pub fn get_generator_parameters(suffix: Option<&str>) -> Result<GeneratorParameters> {
    let classified = suffix
        .and_then(Suffix::classify)
        .ok_or_else(|| AutoQueryError::invalid_suffix(suffix))?;

    match classified {
        Suffix::Count | Suffix::Total => Ok(COUNTER),
        Suffix::Seconds => Ok(GAUGE.with_unit(Unit::Seconds)),
        Suffix::Bytes => Ok(GAUGE.with_unit(Unit::Bytes)),
        Suffix::Bucket | Suffix::Other(_) => Ok(GAUGE),
        Suffix::Sum => Err(AutoQueryError::invalid_suffix(suffix)),
    }
}

/// Unit implied by a single name segment, `short` when it names no unit
pub fn unit_for_token(token: Option<&str>) -> Unit {
    match token.and_then(Suffix::classify) {
        Some(Suffix::Seconds) => Unit::Seconds,
        Some(Suffix::Bytes) => Unit::Bytes,
        _ => Unit::Short,
    }
}
