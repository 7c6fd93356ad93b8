//! Evaluates a saved analysis payload offline and prints the report or an export.
//!
//! Usage: `score-payload <file.json> [--format report|json|csv]`

use aeo_report_api::config::panel_toggles_from_env;
use aeo_report_api::defaults::FallbackDefaults;
use aeo_report_api::export::{to_archive_json, to_csv};
use aeo_report_api::models::AnalysisResult;
use aeo_report_api::report::ReportEngine;
use anyhow::{bail, Context};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Report,
    Json,
    Csv,
}

impl OutputFormat {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw {
            "report" => Ok(OutputFormat::Report),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => bail!("Unknown format '{}': expected report, json or csv", other),
        }
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<(String, OutputFormat)> {
    let mut path = None;
    let mut format = OutputFormat::Report;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--format" | "-f" => {
                let value = iter.next().context("--format needs a value")?;
                format = OutputFormat::parse(value)?;
            }
            flag if flag.starts_with("--format=") => {
                format = OutputFormat::parse(&flag["--format=".len()..])?;
            }
            other if path.is_none() => path = Some(other.to_string()),
            other => bail!("Unexpected argument '{}'", other),
        }
    }

    let path = path.context("Usage: score-payload <file.json> [--format report|json|csv]")?;
    Ok((path, format))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aeo_report_api=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (path, format) = parse_args(&args)?;

    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;
    let raw: serde_json::Value =
        serde_json::from_str(&contents).with_context(|| format!("{} is not valid JSON", path))?;

    let engine = ReportEngine::new(FallbackDefaults::default(), panel_toggles_from_env()?);
    let report = engine.evaluate(Some(&AnalysisResult::from_value(&raw)));
    tracing::info!(
        "Evaluated {} ({} live module(s))",
        path,
        report.live_modules.len()
    );

    let now = chrono::Utc::now();
    match format {
        OutputFormat::Report => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Json => println!("{}", to_archive_json(&raw, &report, now)?),
        OutputFormat::Csv => print!("{}", to_csv(&report, now)),
    }

    Ok(())
}
