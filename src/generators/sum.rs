//! Sum generator for `..._sum` metrics.
//!
//! The segment before `sum` carries the meaning; the `sum` suffix itself
//! always implies a rate.

use super::MetricNameParts;
use crate::error::{AutoQueryError, Result};
use crate::queries::{generate_queries, QueryDefinitionSet};
use crate::rules::{get_generator_parameters, GeneratorParameters, Suffix};

pub fn parameters(parts: &MetricNameParts<'_>) -> Result<GeneratorParameters> {
    if parts.last().and_then(Suffix::classify) != Some(Suffix::Sum) {
        return Err(AutoQueryError::missing_sum_suffix(parts.to_string()));
    }

    let functional_suffix = parts.from_end(1);
    if functional_suffix
        .and_then(Suffix::classify)
        .is_some_and(|s| s.is_reserved())
    {
        return Err(AutoQueryError::invalid_suffix(functional_suffix));
    }
    Ok(get_generator_parameters(functional_suffix)?.with_rate())
}

pub fn generator(parts: &MetricNameParts<'_>) -> Result<QueryDefinitionSet> {
    let params = parameters(parts)?;
    Ok(generate_queries(&params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Aggregation, Unit};

    #[test]
    fn test_requires_sum_suffix() {
        let parts = MetricNameParts::from(vec!["metric", "without", "sum", "suffix"]);
        assert!(matches!(
            generator(&parts),
            Err(AutoQueryError::MissingSumSuffix { .. })
        ));
    }

    #[test]
    fn test_rate_forced_for_every_functional_suffix() {
        let cases = [
            ("count", Aggregation::Sum, Unit::Short),
            ("total", Aggregation::Sum, Unit::Short),
            ("thing", Aggregation::Avg, Unit::Short),
            ("seconds", Aggregation::Avg, Unit::Seconds),
            ("bytes", Aggregation::Avg, Unit::Bytes),
        ];

        for (suffix, aggregation, unit) in cases {
            let parts = MetricNameParts::from(vec!["a", "b", suffix, "sum"]);
            assert_eq!(
                parameters(&parts).unwrap(),
                GeneratorParameters::new(aggregation, true, unit),
                "functional suffix {:?}",
                suffix
            );
        }
    }

    #[test]
    fn test_bare_sum_has_no_functional_suffix() {
        let parts = MetricNameParts::from(vec!["sum"]);
        assert!(matches!(
            parameters(&parts),
            Err(AutoQueryError::InvalidSuffix { suffix: None })
        ));
    }

    #[test]
    fn test_stacked_reserved_tokens_fail() {
        let cases = [
            (vec!["x", "sum", "sum"], "sum"),
            (vec!["x", "bucket", "sum"], "bucket"),
        ];
        for (parts, token) in cases {
            let parts = MetricNameParts::from(parts);
            match parameters(&parts) {
                Err(AutoQueryError::InvalidSuffix { suffix }) => {
                    assert_eq!(suffix.as_deref(), Some(token));
                }
                other => panic!("expected InvalidSuffix for {}, got {:?}", parts, other),
            }
        }
    }

    #[test]
    fn test_seconds_sum_query() {
        let parts = MetricNameParts::from(vec!["my", "metric", "seconds", "sum"]);
        let set = generator(&parts).unwrap();
        assert_eq!(
            set.main.exprs(),
            vec!["avg(rate(${metric}{${filters}}[$__rate_interval]))"]
        );
        assert_eq!(set.main.unit, Unit::Seconds);
    }
}
