//! Query Builder
//!
//! Renders query templates from resolved [`GeneratorParameters`]. The
//! templates keep placeholders for the caller to substitute:
//!
//! - `${metric}` - metric reference
//! - `${filters}` - label filter
//! - `${groupby}` - group-by labels
//! - `$__rate_interval` - rate window

use crate::rules::{GeneratorParameters, Unit};
use serde::{Deserialize, Serialize};

pub const VAR_METRIC: &str = "${metric}";
pub const VAR_FILTERS: &str = "${filters}";
pub const VAR_GROUP_BY: &str = "${groupby}";
pub const RATE_INTERVAL: &str = "$__rate_interval";

/// Quantiles rendered for histogram buckets, highest first
pub const BUCKET_QUANTILES: [f64; 3] = [0.99, 0.90, 0.50];

/// Quantile used for preview and breakdown of bucket metrics
pub const PREVIEW_QUANTILE: f64 = 0.50;

/// Result format requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFormat {
    #[default]
    TimeSeries,
    Heatmap,
}

/// A single query template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub expr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_format: Option<String>,
    #[serde(default)]
    pub format: QueryFormat,
}

impl Query {
    pub fn new(expr: impl Into<String>) -> Self {
        Query {
            expr: expr.into(),
            legend_format: None,
            format: QueryFormat::TimeSeries,
        }
    }

    pub fn with_legend(mut self, legend: impl Into<String>) -> Self {
        self.legend_format = Some(legend.into());
        self
    }

    pub fn with_format(mut self, format: QueryFormat) -> Self {
        self.format = format;
        self
    }
}

/// Queries sharing one display unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDefinition {
    pub unit: Unit,
    pub queries: Vec<Query>,
}

impl QueryDefinition {
    pub fn new(unit: Unit, queries: Vec<Query>) -> Self {
        QueryDefinition { unit, queries }
    }

    /// Expressions in order, mostly for assertions and display
    pub fn exprs(&self) -> Vec<&str> {
        self.queries.iter().map(|q| q.expr.as_str()).collect()
    }
}

/// Alternative rendering offered for the same metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDefinition {
    pub variant: String,
    pub unit: Unit,
    pub queries: Vec<Query>,
}

/// Complete set of queries derived for one metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDefinitionSet {
    pub main: QueryDefinition,
    pub preview: QueryDefinition,
    pub breakdown: QueryDefinition,
    pub variants: Vec<VariantDefinition>,
}

impl QueryDefinitionSet {
    /// Look up a variant by label
    pub fn variant(&self, label: &str) -> Option<&VariantDefinition> {
        self.variants.iter().find(|v| v.variant == label)
    }
}

fn selector() -> String {
    format!("{}{{{}}}", VAR_METRIC, VAR_FILTERS)
}

fn rate_of_selector() -> String {
    format!("rate({}[{}])", selector(), RATE_INTERVAL)
}

fn breakdown_legend() -> String {
    format!("{{{{{}}}}}", VAR_GROUP_BY)
}

/// Build main, preview and breakdown for a non-histogram metric
pub fn generate_queries(params: &GeneratorParameters) -> QueryDefinitionSet {
    let inner = if params.use_rate {
        rate_of_selector()
    } else {
        selector()
    };
    let main_expr = format!("{}({})", params.aggregation, inner);
    let breakdown_expr = format!("{} by({})", main_expr, VAR_GROUP_BY);

    let main = QueryDefinition::new(params.unit, vec![Query::new(main_expr)]);

    QueryDefinitionSet {
        preview: main.clone(),
        main,
        breakdown: QueryDefinition::new(
            params.unit,
            vec![Query::new(breakdown_expr).with_legend(breakdown_legend())],
        ),
        variants: Vec::new(),
    }
}

/// Two-decimal rendering used inside `histogram_quantile`
pub fn format_quantile(quantile: f64) -> String {
    format!("{:.2}", quantile)
}

fn percentile_legend(quantile: f64) -> String {
    format!("{}th Percentile", (quantile * 100.0).round() as u32)
}

fn quantile_expr(quantile: f64, by: &str) -> String {
    format!(
        "histogram_quantile({}, sum by({}) ({}))",
        format_quantile(quantile),
        by,
        rate_of_selector()
    )
}

fn percentile_query(quantile: f64) -> Query {
    Query::new(quantile_expr(quantile, "le")).with_legend(percentile_legend(quantile))
}

/// Build the histogram-quantile query set for a `_bucket` metric
pub fn generate_bucket_queries(unit: Unit) -> QueryDefinitionSet {
    let percentiles: Vec<Query> = BUCKET_QUANTILES
        .iter()
        .map(|&q| percentile_query(q))
        .collect();

    let breakdown_by = format!("le, {}", VAR_GROUP_BY);
    let breakdown = Query::new(quantile_expr(PREVIEW_QUANTILE, &breakdown_by))
        .with_legend(breakdown_legend());

    let heatmap = Query::new(format!("sum by(le) ({})", rate_of_selector()))
        .with_legend("{{le}}")
        .with_format(QueryFormat::Heatmap);

    QueryDefinitionSet {
        main: QueryDefinition::new(unit, percentiles.clone()),
        preview: QueryDefinition::new(unit, vec![percentile_query(PREVIEW_QUANTILE)]),
        breakdown: QueryDefinition::new(unit, vec![breakdown]),
        variants: vec![
            VariantDefinition {
                variant: "percentiles".to_string(),
                unit,
                queries: percentiles,
            },
            VariantDefinition {
                variant: "heatmap".to_string(),
                unit,
                queries: vec![heatmap],
            },
        ],
    }
}

/// Values substituted into query templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateBindings {
    pub metric: String,
    pub filters: String,
    pub group_by: String,
    /// Left as `$__rate_interval` when unset
    pub rate_interval: Option<String>,
}

impl TemplateBindings {
    pub fn new(metric: impl Into<String>) -> Self {
        TemplateBindings {
            metric: metric.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = filters.into();
        self
    }

    pub fn with_group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = group_by.into();
        self
    }

    pub fn with_rate_interval(mut self, interval: impl Into<String>) -> Self {
        self.rate_interval = Some(interval.into());
        self
    }

    /// Substitute placeholders in one expression
    pub fn render(&self, expr: &str) -> String {
        let rendered = expr
            .replace(VAR_METRIC, &self.metric)
            .replace(VAR_FILTERS, &self.filters)
            .replace(VAR_GROUP_BY, &self.group_by);
        match &self.rate_interval {
            Some(interval) => rendered.replace(RATE_INTERVAL, interval),
            None => rendered,
        }
    }

    /// Substitute placeholders across a whole set, legends included
    pub fn render_set(&self, set: &QueryDefinitionSet) -> QueryDefinitionSet {
        let render_queries = |queries: &[Query]| -> Vec<Query> {
            queries
                .iter()
                .map(|q| Query {
                    expr: self.render(&q.expr),
                    legend_format: q.legend_format.as_deref().map(|l| self.render(l)),
                    format: q.format,
                })
                .collect()
        };
        let render_def =
            |def: &QueryDefinition| QueryDefinition::new(def.unit, render_queries(&def.queries));

        QueryDefinitionSet {
            main: render_def(&set.main),
            preview: render_def(&set.preview),
            breakdown: render_def(&set.breakdown),
            variants: set
                .variants
                .iter()
                .map(|v| VariantDefinition {
                    variant: v.variant.clone(),
                    unit: v.unit,
                    queries: render_queries(&v.queries),
                })
                .collect(),
        }
    }
}
