//! General generator: the last segment is the functional suffix.

use super::MetricNameParts;
use crate::error::Result;
use crate::queries::{generate_queries, QueryDefinitionSet};
use crate::rules::{get_generator_parameters, unit_for_token, GeneratorParameters, Suffix};

/// Resolve parameters for a metric routed to the general generator.
///
/// A `_count` series counts observations of the family named before it, so
/// it inherits that segment's unit (`..._seconds_count` -> `s`).
pub fn parameters(parts: &MetricNameParts<'_>) -> Result<GeneratorParameters> {
    let suffix = parts.last();
    let params = get_generator_parameters(suffix)?;

    match suffix.and_then(Suffix::classify) {
        Some(Suffix::Count) => Ok(params.with_unit(unit_for_token(parts.from_end(1)))),
        _ => Ok(params),
    }
}

pub fn generator(parts: &MetricNameParts<'_>) -> Result<QueryDefinitionSet> {
    let params = parameters(parts)?;
    Ok(generate_queries(&params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoQueryError;
    use crate::rules::{Aggregation, Unit};

    fn expected_cases() -> Vec<(&'static str, GeneratorParameters)> {
        vec![
            ("count", GeneratorParameters::new(Aggregation::Sum, true, Unit::Short)),
            ("total", GeneratorParameters::new(Aggregation::Sum, true, Unit::Short)),
            ("thing", GeneratorParameters::new(Aggregation::Avg, false, Unit::Short)),
            ("seconds", GeneratorParameters::new(Aggregation::Avg, false, Unit::Seconds)),
            ("bytes", GeneratorParameters::new(Aggregation::Avg, false, Unit::Bytes)),
        ]
    }

    #[test]
    fn test_parameters_follow_suffix() {
        for (suffix, expected) in expected_cases() {
            let parts = MetricNameParts::from(vec!["a", "b", suffix]);
            assert_eq!(parameters(&parts).unwrap(), expected, "suffix {:?}", suffix);
        }
    }

    #[test]
    fn test_sum_suffix_rejected() {
        let parts = MetricNameParts::from(vec!["metric", "with", "suffix", "sum"]);
        assert!(matches!(
            generator(&parts),
            Err(AutoQueryError::InvalidSuffix { .. })
        ));
    }

    #[test]
    fn test_count_inherits_family_unit() {
        let parts = MetricNameParts::from(vec!["my", "metric", "seconds", "count"]);
        let params = parameters(&parts).unwrap();
        assert_eq!(params.aggregation, Aggregation::Sum);
        assert!(params.use_rate);
        assert_eq!(params.unit, Unit::Seconds);
    }

    #[test]
    fn test_total_keeps_short_unit() {
        let parts = MetricNameParts::from(vec!["my", "metric", "seconds", "total"]);
        assert_eq!(parameters(&parts).unwrap().unit, Unit::Short);
    }

    #[test]
    fn test_single_segment_count() {
        let parts = MetricNameParts::from(vec!["count"]);
        assert_eq!(parameters(&parts).unwrap().unit, Unit::Short);
    }
}
