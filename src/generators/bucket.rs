//! Bucket generator for histogram `..._bucket` metrics.

use super::MetricNameParts;
use crate::error::{AutoQueryError, Result};
use crate::queries::{generate_bucket_queries, QueryDefinitionSet};
use crate::rules::{unit_for_token, Suffix, Unit};

/// Unit of the histogram, taken from the segment before `bucket`
pub fn unit(parts: &MetricNameParts<'_>) -> Result<Unit> {
    if parts.last().and_then(Suffix::classify) != Some(Suffix::Bucket) {
        return Err(AutoQueryError::missing_bucket_suffix(parts.to_string()));
    }

    let family = parts.from_end(1);
    match family.and_then(Suffix::classify) {
        Some(s) if s.is_reserved() => Err(AutoQueryError::invalid_suffix(family)),
        _ => Ok(unit_for_token(family)),
    }
}

pub fn generator(parts: &MetricNameParts<'_>) -> Result<QueryDefinitionSet> {
    Ok(generate_bucket_queries(unit(parts)?))
}
