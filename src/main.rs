use auto_query::config::{EngineConfig, ENV_DELIMITER};
use auto_query::observability::init_tracing;
use auto_query::{AutoQueryEngine, AutoQueryError, QueryDefinitionSet, TemplateBindings};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "autoquery")]
#[command(version)]
#[command(about = "Derive dashboard queries from metric names", long_about = None)]
struct Cli {
    /// Metric names to generate queries for
    #[arg(required = true)]
    metrics: Vec<String>,

    /// Path to configuration file
    #[arg(short, long, env = "AUTOQUERY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the metric name delimiter
    #[arg(short, long)]
    delimiter: Option<String>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Substitute `${filters}` with this label filter
    #[arg(long)]
    filters: Option<String>,

    /// Substitute `${groupby}` with these labels
    #[arg(long)]
    groupby: Option<String>,

    /// Substitute `$__rate_interval` with this window
    #[arg(long)]
    rate_interval: Option<String>,
}

impl Cli {
    fn load_config(&self) -> auto_query::Result<EngineConfig> {
        let config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?.with_env_overrides()?,
            None => EngineConfig::from_env()?,
        };
        match &self.delimiter {
            Some(d) => {
                let config = config.with_delimiter(d.clone());
                config.validate()?;
                Ok(config)
            }
            None => Ok(config),
        }
    }

    fn wants_rendering(&self) -> bool {
        self.filters.is_some() || self.groupby.is_some() || self.rate_interval.is_some()
    }

    fn bindings_for(&self, metric: &str) -> TemplateBindings {
        let mut bindings = TemplateBindings::new(metric)
            .with_filters(self.filters.clone().unwrap_or_default())
            .with_group_by(self.groupby.clone().unwrap_or_default());
        if let Some(interval) = &self.rate_interval {
            bindings = bindings.with_rate_interval(interval.clone());
        }
        bindings
    }
}

/// Query sets produced for one invocation
#[derive(Debug, Default)]
struct Report<'a> {
    output: BTreeMap<&'a str, QueryDefinitionSet>,
    rejected: Vec<(&'a str, AutoQueryError)>,
}

impl<'a> Report<'a> {
    fn generate(engine: &AutoQueryEngine, cli: &'a Cli) -> Self {
        let mut report = Report::default();

        for metric in &cli.metrics {
            match engine.queries_for_metric(metric) {
                Ok(set) if cli.wants_rendering() => {
                    let rendered = cli.bindings_for(metric).render_set(&set);
                    report.output.insert(metric, rendered);
                }
                Ok(set) => {
                    report.output.insert(metric, set);
                }
                Err(e) => report.rejected.push((metric, e)),
            }
        }

        report
    }

    fn is_success(&self) -> bool {
        self.rejected.is_empty()
    }

    fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = cli
        .load_config()
        .map_err(|e| format!("{} (see --config, --delimiter, {})", e, ENV_DELIMITER))?;
    init_tracing(&config.logging).map_err(|e| e.to_string())?;

    let engine = AutoQueryEngine::new(config);
    let report = Report::generate(&engine, &cli);

    for (metric, e) in &report.rejected {
        eprintln!("{}: {}", metric, e);
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report.output)?
    } else {
        serde_json::to_string(&report.output)?
    };
    println!("{}", json);

    tracing::info!(
        generated = report.output.len(),
        rejected = report.rejected.len(),
        delimiter = %engine.config().delimiter,
        "done"
    );

    Ok(report.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("autoquery").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_requires_a_metric() {
        assert!(Cli::try_parse_from(["autoquery"]).is_err());
    }

    #[test]
    fn test_templates_kept_without_binding_flags() {
        let cli = cli(&["my_metric_total"]);
        assert!(!cli.wants_rendering());

        let report = Report::generate(&AutoQueryEngine::default(), &cli);
        assert!(report.is_success());
        assert_eq!(
            report.output["my_metric_total"].main.queries[0].expr,
            "sum(rate(${metric}{${filters}}[$__rate_interval]))"
        );
    }

    #[test]
    fn test_binding_flags_render_queries() {
        let cli = cli(&[
            "--filters",
            "job=\"api\"",
            "--groupby",
            "instance",
            "--rate-interval",
            "5m",
            "http_requests_total",
        ]);
        assert!(cli.wants_rendering());

        let report = Report::generate(&AutoQueryEngine::default(), &cli);
        let set = &report.output["http_requests_total"];
        assert_eq!(
            set.breakdown.queries[0].expr,
            "sum(rate(http_requests_total{job=\"api\"}[5m])) by(instance)"
        );
        assert_eq!(set.breakdown.queries[0].legend_format.as_deref(), Some("{{instance}}"));
    }

    #[test]
    fn test_partial_binding_leaves_rate_interval() {
        let cli = cli(&["--groupby", "pod", "my_metric_count"]);
        let bindings = cli.bindings_for("my_metric_count");
        assert_eq!(bindings.filters, "");
        assert_eq!(bindings.group_by, "pod");
        assert_eq!(bindings.rate_interval, None);
        assert_eq!(
            bindings.render("sum(rate(${metric}{${filters}}[$__rate_interval]))"),
            "sum(rate(my_metric_count{}[$__rate_interval]))"
        );
    }

    #[test]
    fn test_rejection_fails_the_run() {
        let cli = cli(&["my_metric_bucket", "my_metric_", "x_bucket_sum"]);
        let report = Report::generate(&AutoQueryEngine::default(), &cli);

        assert!(!report.is_success());
        assert_eq!(report.output.len(), 1);
        let rejected: Vec<&str> = report.rejected.iter().map(|(m, _)| *m).collect();
        assert_eq!(rejected, vec!["my_metric_", "x_bucket_sum"]);
        assert!(report
            .rejected
            .iter()
            .all(|(_, e)| matches!(e, AutoQueryError::InvalidSuffix { .. })));
    }

    #[test]
    fn test_delimiter_flag_overrides_config() {
        let cli = cli(&["--delimiter", ".", "http.request.seconds.bucket"]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.delimiter, ".");

        let report = Report::generate(&AutoQueryEngine::new(config), &cli);
        assert!(report.is_success());
        assert_eq!(report.output["http.request.seconds.bucket"].main.queries.len(), 3);
    }

    #[test]
    fn test_empty_delimiter_flag_rejected() {
        let cli = cli(&["--delimiter", "", "my_metric_total"]);
        assert!(matches!(cli.load_config(), Err(AutoQueryError::Config { .. })));
    }
}
