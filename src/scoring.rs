//! Category and composite scores.
//!
//! Two substitution rules coexist here and are intentional:
//! - leaf categories shown on their own fall back to the placeholder table;
//! - the Strategy Review average counts a missing category as 0, so an
//!   incomplete run is penalised instead of renormalised.
//!
//! Whether a number is a measurement is decided separately, in
//! [`crate::provenance`].

use serde::Serialize;

use crate::availability::{module_score, ModuleKind};
use crate::bot_access::{Bot, BotAccessScorer};
use crate::defaults::FallbackDefaults;
use crate::models::{AnalysisResult, DetailedAnalysis, StructuredDataSummary};

/// Rounds half-up to an integer percentage in [0, 100].
pub fn round_half_up(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor().clamp(0.0, 100.0) as u32
}

/// Every displayed score of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompositeScores {
    pub overall: u32,
    pub ai_presence: u32,
    pub competitor_landscape: u32,
    pub strategy_review: u32,
    pub chatgpt: u32,
    pub gemini: u32,
    pub claude: u32,
    pub answerability: u32,
    pub knowledge_base: u32,
    pub structured_data: u32,
    pub crawler_access: u32,
}

/// Combines module scores into category and composite scores.
#[derive(Debug, Clone, Copy)]
pub struct CompositeScoreCalculator {
    defaults: FallbackDefaults,
    bots: BotAccessScorer,
}

impl CompositeScoreCalculator {
    pub fn new(defaults: FallbackDefaults) -> Self {
        Self {
            defaults,
            bots: BotAccessScorer::new(defaults),
        }
    }

    pub fn defaults(&self) -> &FallbackDefaults {
        &self.defaults
    }

    /// Unrounded mean of coverage, quality and completeness.
    ///
    /// 0 when the record is absent; a missing sub-score counts as 0.
    pub fn structured_data_mean(&self, structured: Option<&StructuredDataSummary>) -> f64 {
        let Some(sd) = structured else {
            return 0.0;
        };
        let sum: f64 = [sd.coverage_score, sd.quality_score, sd.completeness_score]
            .into_iter()
            .map(|s| s.map(crate::availability::clamp_score).unwrap_or(0.0))
            .sum();
        sum / 3.0
    }

    pub fn structured_data_composite(&self, structured: Option<&StructuredDataSummary>) -> u32 {
        round_half_up(self.structured_data_mean(structured))
    }

    /// Mean of Answerability, Knowledge Base, Structured Data and Crawler
    /// Accessibility, with each missing category contributing 0.
    pub fn strategy_review(
        &self,
        detailed: Option<&DetailedAnalysis>,
        structured: Option<&StructuredDataSummary>,
    ) -> u32 {
        let modules: f64 = [
            ModuleKind::Answerability,
            ModuleKind::KnowledgeBase,
            ModuleKind::CrawlerAccessibility,
        ]
        .into_iter()
        .map(|kind| module_score(detailed, kind).unwrap_or(0.0))
        .sum();

        round_half_up((modules + self.structured_data_mean(structured)) / 4.0)
    }

    /// Reported overall score, or the placeholder when it is missing or zero.
    pub fn overall(&self, reported: Option<f64>) -> u32 {
        match reported {
            Some(score) if score.is_finite() && score != 0.0 => round_half_up(score),
            _ => self.defaults.overall,
        }
    }

    /// Module score, or `placeholder` when the module is absent.
    fn category(&self, detailed: Option<&DetailedAnalysis>, kind: ModuleKind, placeholder: u32) -> u32 {
        module_score(detailed, kind)
            .map(round_half_up)
            .unwrap_or(placeholder)
    }

    pub fn ai_presence(&self, detailed: Option<&DetailedAnalysis>) -> u32 {
        self.category(detailed, ModuleKind::AiPresence, self.defaults.ai_presence)
    }

    pub fn competitor_landscape(&self, detailed: Option<&DetailedAnalysis>) -> u32 {
        self.category(
            detailed,
            ModuleKind::CompetitorAnalysis,
            self.defaults.competitor_landscape,
        )
    }

    pub fn answerability(&self, detailed: Option<&DetailedAnalysis>) -> u32 {
        self.category(detailed, ModuleKind::Answerability, self.defaults.answerability)
    }

    pub fn knowledge_base(&self, detailed: Option<&DetailedAnalysis>) -> u32 {
        self.category(detailed, ModuleKind::KnowledgeBase, self.defaults.knowledge_base)
    }

    pub fn crawler_access(&self, detailed: Option<&DetailedAnalysis>) -> u32 {
        self.category(
            detailed,
            ModuleKind::CrawlerAccessibility,
            self.defaults.crawler_access,
        )
    }

    pub fn bot(&self, detailed: Option<&DetailedAnalysis>, bot: Bot) -> u32 {
        self.bots
            .score(bot, crate::availability::ai_presence_checks(detailed))
    }

    /// Computes every displayed score for a payload.
    pub fn compute(&self, result: &AnalysisResult) -> CompositeScores {
        let detailed = result.detailed_analysis.as_ref();
        let structured = result.structured_data.as_ref();

        CompositeScores {
            overall: self.overall(result.overall_score),
            ai_presence: self.ai_presence(detailed),
            competitor_landscape: self.competitor_landscape(detailed),
            strategy_review: self.strategy_review(detailed, structured),
            chatgpt: self.bot(detailed, Bot::ChatGpt),
            gemini: self.bot(detailed, Bot::Gemini),
            claude: self.bot(detailed, Bot::Claude),
            answerability: self.answerability(detailed),
            knowledge_base: self.knowledge_base(detailed),
            structured_data: self.structured_data_composite(structured),
            crawler_access: self.crawler_access(detailed),
        }
    }
}

impl Default for CompositeScoreCalculator {
    fn default() -> Self {
        Self::new(FallbackDefaults::default())
    }
}
