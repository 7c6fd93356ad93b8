//! Live/Static tagging of displayed metrics.

use serde::{Deserialize, Serialize};

use crate::availability::{ModuleAvailability, ModuleKind};
use crate::scoring::CompositeScores;

/// Whether a displayed number is backed by a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Static,
}

impl Provenance {
    pub fn from_live(live: bool) -> Self {
        if live {
            Provenance::Live
        } else {
            Provenance::Static
        }
    }

    pub fn is_live(self) -> bool {
        self == Provenance::Live
    }
}

/// The eleven metrics shown on a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Overall,
    AiPresence,
    CompetitorLandscape,
    StrategyReview,
    ChatGpt,
    Gemini,
    Claude,
    Answerability,
    KnowledgeBase,
    StructuredData,
    CrawlerAccess,
}

const OVERALL_SOURCES: &[ModuleKind] = &ModuleKind::ALL;

const STRATEGY_REVIEW_SOURCES: &[ModuleKind] = &[
    ModuleKind::Answerability,
    ModuleKind::KnowledgeBase,
    ModuleKind::CrawlerAccessibility,
];

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::Overall,
        Metric::AiPresence,
        Metric::CompetitorLandscape,
        Metric::StrategyReview,
        Metric::ChatGpt,
        Metric::Gemini,
        Metric::Claude,
        Metric::Answerability,
        Metric::KnowledgeBase,
        Metric::StructuredData,
        Metric::CrawlerAccess,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Overall => "Overall",
            Metric::AiPresence => "AI Presence",
            Metric::CompetitorLandscape => "Competitor Landscape",
            Metric::StrategyReview => "Strategy Review",
            Metric::ChatGpt => "ChatGPT",
            Metric::Gemini => "Gemini",
            Metric::Claude => "Claude",
            Metric::Answerability => "Answerability",
            Metric::KnowledgeBase => "Knowledge Base",
            Metric::StructuredData => "Structured Data",
            Metric::CrawlerAccess => "Crawler Access",
        }
    }

    /// Modules this metric reads from.
    ///
    /// Structured data has none: it is always treated as instrumented, so its
    /// tag cannot reflect a missing `structured_data` record.
    pub fn sources(self) -> &'static [ModuleKind] {
        match self {
            Metric::Overall => OVERALL_SOURCES,
            Metric::AiPresence | Metric::ChatGpt | Metric::Gemini | Metric::Claude => {
                &[ModuleKind::AiPresence]
            }
            Metric::CompetitorLandscape => &[ModuleKind::CompetitorAnalysis],
            Metric::StrategyReview => STRATEGY_REVIEW_SOURCES,
            Metric::Answerability => &[ModuleKind::Answerability],
            Metric::KnowledgeBase => &[ModuleKind::KnowledgeBase],
            Metric::CrawlerAccess => &[ModuleKind::CrawlerAccessibility],
            Metric::StructuredData => &[],
        }
    }

    fn value(self, scores: &CompositeScores) -> u32 {
        match self {
            Metric::Overall => scores.overall,
            Metric::AiPresence => scores.ai_presence,
            Metric::CompetitorLandscape => scores.competitor_landscape,
            Metric::StrategyReview => scores.strategy_review,
            Metric::ChatGpt => scores.chatgpt,
            Metric::Gemini => scores.gemini,
            Metric::Claude => scores.claude,
            Metric::Answerability => scores.answerability,
            Metric::KnowledgeBase => scores.knowledge_base,
            Metric::StructuredData => scores.structured_data,
            Metric::CrawlerAccess => scores.crawler_access,
        }
    }
}

/// Facts beyond module availability that affect tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProvenanceSignals {
    /// The AI presence module carries a `checks` map.
    pub checks_present: bool,
    /// The payload reported a non-zero overall score.
    pub overall_reported: bool,
}

/// A displayed number with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnotatedMetric {
    pub metric: Metric,
    pub label: &'static str,
    pub value: u32,
    pub provenance: Provenance,
}

/// All eleven annotated metrics, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricBoard {
    metrics: Vec<AnnotatedMetric>,
}

impl MetricBoard {
    pub fn get(&self, metric: Metric) -> AnnotatedMetric {
        // The board is always built from Metric::ALL.
        self.metrics[metric as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedMetric> {
        self.metrics.iter()
    }

    /// Value when the metric is live, `None` otherwise.
    pub fn live_value(&self, metric: Metric) -> Option<u32> {
        let annotated = self.get(metric);
        annotated.provenance.is_live().then_some(annotated.value)
    }
}

/// Pairs each metric with its Live/Static tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvenanceAnnotator;

impl ProvenanceAnnotator {
    /// Live iff every source module is live, plus metric-specific conditions:
    /// bots need the `checks` map and Overall needs a reported score.
    pub fn provenance(
        &self,
        metric: Metric,
        availability: &ModuleAvailability,
        signals: &ProvenanceSignals,
    ) -> Provenance {
        let extra = match metric {
            Metric::ChatGpt | Metric::Gemini | Metric::Claude => signals.checks_present,
            Metric::Overall => signals.overall_reported,
            _ => true,
        };
        Provenance::from_live(extra && availability.all_live(metric.sources()))
    }

    pub fn annotate(
        &self,
        scores: &CompositeScores,
        availability: &ModuleAvailability,
        signals: &ProvenanceSignals,
    ) -> MetricBoard {
        let metrics = Metric::ALL
            .into_iter()
            .map(|metric| AnnotatedMetric {
                metric,
                label: metric.label(),
                value: metric.value(scores),
                provenance: self.provenance(metric, availability, signals),
            })
            .collect();

        MetricBoard { metrics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisResult, DetailedAnalysis};
    use crate::scoring::CompositeScoreCalculator;
    use serde_json::json;

    fn availability(value: serde_json::Value) -> ModuleAvailability {
        let detailed: DetailedAnalysis = serde_json::from_value(value).unwrap();
        ModuleAvailability::resolve(Some(&detailed))
    }

    #[test]
    fn test_board_order_matches_metric_index() {
        let scores = CompositeScoreCalculator::default().compute(&AnalysisResult::default());
        let board = ProvenanceAnnotator.annotate(
            &scores,
            &ModuleAvailability::default(),
            &ProvenanceSignals::default(),
        );

        for metric in Metric::ALL {
            assert_eq!(board.get(metric).metric, metric);
        }
        assert_eq!(board.iter().count(), 11);
    }

    #[test]
    fn test_leaf_follows_module() {
        let a = availability(json!({"knowledge_base": {"score": 88}}));
        let signals = ProvenanceSignals::default();

        assert_eq!(ProvenanceAnnotator.provenance(Metric::KnowledgeBase, &a, &signals), Provenance::Live);
        assert_eq!(ProvenanceAnnotator.provenance(Metric::Answerability, &a, &signals), Provenance::Static);
    }

    #[test]
    fn test_structured_data_always_live() {
        let signals = ProvenanceSignals::default();
        assert_eq!(
            ProvenanceAnnotator.provenance(Metric::StructuredData, &ModuleAvailability::default(), &signals),
            Provenance::Live
        );
    }

    #[test]
    fn test_strategy_review_needs_every_category() {
        let signals = ProvenanceSignals::default();
        let partial = availability(json!({
            "answerability": {"score": 80},
            "knowledge_base": {"score": 80}
        }));
        let full = availability(json!({
            "answerability": {"score": 80},
            "knowledge_base": {"score": 80},
            "crawler_accessibility": {"score": 80}
        }));

        assert_eq!(ProvenanceAnnotator.provenance(Metric::StrategyReview, &partial, &signals), Provenance::Static);
        assert_eq!(ProvenanceAnnotator.provenance(Metric::StrategyReview, &full, &signals), Provenance::Live);
    }

    #[test]
    fn test_bots_need_checks() {
        let a = availability(json!({"ai_presence": {"score": 70}}));
        let without = ProvenanceSignals { checks_present: false, overall_reported: false };
        let with = ProvenanceSignals { checks_present: true, overall_reported: false };

        assert_eq!(ProvenanceAnnotator.provenance(Metric::Gemini, &a, &without), Provenance::Static);
        assert_eq!(ProvenanceAnnotator.provenance(Metric::Gemini, &a, &with), Provenance::Live);
        // Checks without a live module stay static.
        assert_eq!(
            ProvenanceAnnotator.provenance(Metric::Gemini, &ModuleAvailability::default(), &with),
            Provenance::Static
        );
    }

    #[test]
    fn test_overall_needs_score_and_all_modules() {
        let all = availability(json!({
            "ai_presence": {"score": 1},
            "competitor_analysis": {"score": 1},
            "knowledge_base": {"score": 1},
            "answerability": {"score": 1},
            "crawler_accessibility": {"score": 1}
        }));
        let reported = ProvenanceSignals { checks_present: false, overall_reported: true };

        assert_eq!(ProvenanceAnnotator.provenance(Metric::Overall, &all, &reported), Provenance::Live);
        assert_eq!(
            ProvenanceAnnotator.provenance(Metric::Overall, &all, &ProvenanceSignals::default()),
            Provenance::Static
        );
    }
}
