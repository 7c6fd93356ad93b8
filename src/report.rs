//! Builds the presentation model for one analysis payload.
//!
//! Pipeline: availability -> bot scores and composites -> provenance. The
//! engine holds no mutable state; `evaluate` is a pure function of its input.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::availability::{
    ai_presence_checks, module_field, module_recommendations, ModuleAvailability, ModuleKind,
};
use crate::defaults::FallbackDefaults;
use crate::models::{AnalysisResult, DetailedAnalysis, StructuredDataSummary};
use crate::provenance::{Metric, MetricBoard, ProvenanceAnnotator, ProvenanceSignals};
use crate::scoring::CompositeScoreCalculator;

/// Rendering switches. They never change scores or provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PanelToggles {
    /// Attach raw per-module detail for live modules.
    pub show_module_details: bool,
    /// Attach the experimental crawl-status summary.
    pub show_crawl_status: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// No payload was supplied; the model holds placeholders only.
    Empty,
    Evaluated,
}

/// Letter grade from an overall score.
pub fn grade_for(score: u32) -> &'static str {
    match score {
        90.. => "A+",
        80..=89 => "A",
        70..=79 => "B",
        60..=69 => "C",
        50..=59 => "D",
        _ => "F",
    }
}

/// Badge colour for a letter grade. Unrecognised grades render red.
pub fn grade_color_for(grade: &str) -> &'static str {
    match grade {
        "A+" | "A" => "#10B981",
        "B" | "C" => "#F59E0B",
        _ => "#EF4444",
    }
}

/// Robots and sitemap facts reported by the crawler accessibility module.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CrawlStatus {
    pub robots_txt_present: Option<bool>,
    pub sitemap_present: Option<bool>,
    pub ai_bot_access: BTreeMap<String, bool>,
}

impl CrawlStatus {
    /// Reads `crawler_accessibility.robots_analysis`; `None` when it is not an object.
    pub fn from_detailed(detailed: Option<&DetailedAnalysis>) -> Option<Self> {
        let robots = module_field(detailed, ModuleKind::CrawlerAccessibility, "robots_analysis")?
            .as_object()?;

        let ai_bot_access = robots
            .get("ai_bot_access")
            .and_then(Value::as_object)
            .map(|access| {
                access
                    .iter()
                    .filter_map(|(agent, allowed)| allowed.as_bool().map(|a| (agent.clone(), a)))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            robots_txt_present: robots.get("robots_txt_present").and_then(Value::as_bool),
            sitemap_present: robots.get("sitemap_present").and_then(Value::as_bool),
            ai_bot_access,
        })
    }
}

/// Everything a report view or export needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportModel {
    pub status: ReportStatus,
    pub url: Option<String>,
    pub grade: String,
    pub grade_color: String,
    pub metrics: MetricBoard,
    pub live_modules: Vec<ModuleKind>,
    pub structured_data: Option<StructuredDataSummary>,
    pub recommendations: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Grade reported by the analysis service, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_grade: Option<String>,
    pub analysis_timestamp: Option<String>,
    pub panels: PanelToggles,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_details: Option<BTreeMap<ModuleKind, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl_status: Option<CrawlStatus>,
}

impl ReportModel {
    pub fn metric(&self, metric: Metric) -> crate::provenance::AnnotatedMetric {
        self.metrics.get(metric)
    }
}

/// Evaluates analysis payloads into report models.
#[derive(Debug, Clone, Copy)]
pub struct ReportEngine {
    calculator: CompositeScoreCalculator,
    annotator: ProvenanceAnnotator,
    panels: PanelToggles,
}

impl ReportEngine {
    pub fn new(defaults: FallbackDefaults, panels: PanelToggles) -> Self {
        Self {
            calculator: CompositeScoreCalculator::new(defaults),
            annotator: ProvenanceAnnotator,
            panels,
        }
    }

    pub fn panels(&self) -> PanelToggles {
        self.panels
    }

    /// Evaluates a payload. `None` yields the neutral model; never fails.
    pub fn evaluate(&self, result: Option<&AnalysisResult>) -> ReportModel {
        match result {
            Some(result) => self.build(result, ReportStatus::Evaluated),
            None => {
                tracing::debug!("No analysis payload supplied; building empty report");
                self.build(&AnalysisResult::default(), ReportStatus::Empty)
            }
        }
    }

    fn build(&self, result: &AnalysisResult, status: ReportStatus) -> ReportModel {
        let detailed = result.detailed_analysis.as_ref();
        let availability = ModuleAvailability::resolve(detailed);
        let scores = self.calculator.compute(result);
        let signals = ProvenanceSignals {
            checks_present: ai_presence_checks(detailed).is_some(),
            overall_reported: result
                .overall_score
                .is_some_and(|s| s.is_finite() && s != 0.0),
        };
        let metrics = self.annotator.annotate(&scores, &availability, &signals);

        let reported_grade = result
            .grade
            .as_ref()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());
        let grade = reported_grade
            .clone()
            .unwrap_or_else(|| grade_for(scores.overall).to_string());

        let module_details: Option<BTreeMap<ModuleKind, Value>> =
            self.panels.show_module_details.then(|| {
                availability
                    .live_modules()
                    .into_iter()
                    .filter_map(|kind| {
                        detailed
                            .and_then(|d| d.module(kind))
                            .map(|raw| (kind, raw.clone()))
                    })
                    .collect()
            });
        let crawl_status = if self.panels.show_crawl_status {
            CrawlStatus::from_detailed(detailed)
        } else {
            None
        };

        tracing::debug!(
            "Evaluated report for {:?}: overall={} ({:?}), live modules={}",
            result.url,
            scores.overall,
            metrics.get(Metric::Overall).provenance,
            availability.live_modules().len()
        );

        ReportModel {
            status,
            url: result.url.clone(),
            grade_color: grade_color_for(&grade).to_string(),
            grade,
            metrics,
            live_modules: availability.live_modules(),
            structured_data: result.structured_data.clone(),
            recommendations: collect_recommendations(result, &availability),
            errors: result.errors.clone(),
            warnings: result.warnings.clone(),
            reported_grade,
            analysis_timestamp: analysis_timestamp(result),
            panels: self.panels,
            module_details,
            crawl_status,
        }
    }
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new(FallbackDefaults::default(), PanelToggles::default())
    }
}

/// Service-merged recommendations when present, otherwise the top-level list
/// followed by each live module's list. Duplicates are dropped.
fn collect_recommendations(result: &AnalysisResult, availability: &ModuleAvailability) -> Vec<String> {
    let candidates: Vec<String> = match &result.all_recommendations {
        Some(all) => all.clone(),
        None => {
            let detailed = result.detailed_analysis.as_ref();
            result
                .recommendations
                .iter()
                .cloned()
                .chain(
                    availability
                        .live_modules()
                        .into_iter()
                        .flat_map(|kind| module_recommendations(detailed, kind)),
                )
                .collect()
        }
    };

    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty() && seen.insert(r.clone()))
        .collect()
}

/// The service writes the literal `None` when it has no timestamp.
fn analysis_timestamp(result: &AnalysisResult) -> Option<String> {
    result
        .analysis_timestamp
        .as_ref()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && t != "None")
}
