pub mod config;
pub mod engine;
pub mod error;
pub mod generators;
pub mod observability;
pub mod queries;
pub mod rules;

pub use config::EngineConfig;
pub use engine::AutoQueryEngine;
pub use error::{AutoQueryError, Result};
pub use generators::{
    get_auto_queries_for_metric, queries_for_metric, GeneratorKind, MetricNameParts,
};
pub use queries::{
    generate_bucket_queries, generate_queries, Query, QueryDefinition, QueryDefinitionSet,
    QueryFormat, TemplateBindings, VariantDefinition,
};
pub use rules::{get_generator_parameters, Aggregation, GeneratorParameters, Suffix, Unit};
