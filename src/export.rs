//! Download formats for a finished report.
//!
//! A value is written only when its metric is Live. Static metrics become an
//! empty CSV field, so "not computed" never reads as "computed as zero".

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::errors::{AppError, ResultExt};
use crate::provenance::Metric;
use crate::report::ReportModel;

/// CSV header, in column order.
pub const CSV_COLUMNS: [&str; 10] = [
    "url",
    "overall_score",
    "grade",
    "AIPresence",
    "CompetitorAnalysis",
    "KnowledgeBase",
    "Answerability",
    "CrawlerAccessibility",
    "StructuredDataComposite",
    "analysis_timestamp",
];

/// One flat export row. `None` means "not measured" and exports as "".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub url: String,
    pub overall_score: Option<u32>,
    pub grade: Option<String>,
    pub ai_presence: Option<u32>,
    pub competitor_analysis: Option<u32>,
    pub knowledge_base: Option<u32>,
    pub answerability: Option<u32>,
    pub crawler_accessibility: Option<u32>,
    pub structured_data_composite: Option<u32>,
    pub analysis_timestamp: String,
}

impl ExportRow {
    /// Flattens a report. `exported_at` stands in for a missing analysis timestamp.
    pub fn from_report(report: &ReportModel, exported_at: DateTime<Utc>) -> Self {
        let metrics = &report.metrics;
        let overall_score = metrics.live_value(Metric::Overall);

        Self {
            url: report.url.clone().unwrap_or_default(),
            overall_score,
            // The grade describes the overall score and is only as trustworthy.
            grade: overall_score.map(|_| report.grade.clone()),
            ai_presence: metrics.live_value(Metric::AiPresence),
            competitor_analysis: metrics.live_value(Metric::CompetitorLandscape),
            knowledge_base: metrics.live_value(Metric::KnowledgeBase),
            answerability: metrics.live_value(Metric::Answerability),
            crawler_accessibility: metrics.live_value(Metric::CrawlerAccess),
            structured_data_composite: metrics.live_value(Metric::StructuredData),
            analysis_timestamp: report
                .analysis_timestamp
                .clone()
                .unwrap_or_else(|| exported_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }

    fn fields(&self) -> [String; 10] {
        let score = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
        [
            self.url.clone(),
            score(self.overall_score),
            self.grade.clone().unwrap_or_default(),
            score(self.ai_presence),
            score(self.competitor_analysis),
            score(self.knowledge_base),
            score(self.answerability),
            score(self.crawler_accessibility),
            score(self.structured_data_composite),
            self.analysis_timestamp.clone(),
        ]
    }

    /// The row as one CSV record, without a trailing newline.
    pub fn to_csv_record(&self) -> String {
        self.fields()
            .iter()
            .map(|f| escape_csv_field(f))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Quotes a field when it contains a delimiter, quote or line break (RFC 4180).
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Header line plus one record, CRLF-terminated.
pub fn to_csv(report: &ReportModel, exported_at: DateTime<Utc>) -> String {
    let row = ExportRow::from_report(report, exported_at);
    format!("{}\r\n{}\r\n", CSV_COLUMNS.join(","), row.to_csv_record())
}

/// Archival document: the payload as received plus everything derived from it.
#[derive(Debug, Serialize)]
pub struct ArchiveDocument<'a> {
    pub exported_at: String,
    pub analysis: &'a Value,
    pub report: &'a ReportModel,
}

/// Pretty-printed archival JSON.
pub fn to_archive_json(
    raw: &Value,
    report: &ReportModel,
    exported_at: DateTime<Utc>,
) -> Result<String, AppError> {
    let document = ArchiveDocument {
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        analysis: raw,
        report,
    };
    serde_json::to_string_pretty(&document).context("Serializing archive export")
}

/// Download file name, e.g. `aeo-report-example.com.csv`.
pub fn export_filename(report: &ReportModel, extension: &str) -> String {
    let host = report
        .url
        .as_deref()
        .and_then(|u| url::Url::parse(u).ok())
        .and_then(|u| u.host_str().map(str::to_string))
        .map(|h| {
            h.chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
                .collect::<String>()
        })
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    format!("aeo-report-{}.{}", host, extension)
}
