//! Presence checks for analysis modules.
//!
//! Every read of a module's score or detail goes through this file, so there is
//! exactly one definition of "this module is live".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::DetailedAnalysis;

/// The five analysis modules produced by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    AiPresence,
    CompetitorAnalysis,
    KnowledgeBase,
    Answerability,
    CrawlerAccessibility,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 5] = [
        ModuleKind::AiPresence,
        ModuleKind::CompetitorAnalysis,
        ModuleKind::KnowledgeBase,
        ModuleKind::Answerability,
        ModuleKind::CrawlerAccessibility,
    ];

    /// Key of the module inside `detailed_analysis`.
    pub fn key(self) -> &'static str {
        match self {
            ModuleKind::AiPresence => "ai_presence",
            ModuleKind::CompetitorAnalysis => "competitor_analysis",
            ModuleKind::KnowledgeBase => "knowledge_base",
            ModuleKind::Answerability => "answerability",
            ModuleKind::CrawlerAccessibility => "crawler_accessibility",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Clamps a score into [0, 100].
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Raw field of a module container.
///
/// Returns `None` when the module is missing, is not an object, or lacks the field.
pub fn module_field<'a>(
    detailed: Option<&'a DetailedAnalysis>,
    kind: ModuleKind,
    field: &str,
) -> Option<&'a Value> {
    detailed?.module(kind)?.as_object()?.get(field)
}

/// Score of a live module, clamped into [0, 100].
///
/// A module is live iff its container is an object whose `score` is a finite
/// number. Strings, booleans and nulls do not count.
pub fn module_score(detailed: Option<&DetailedAnalysis>, kind: ModuleKind) -> Option<f64> {
    module_field(detailed, kind, "score")?
        .as_f64()
        .filter(|s| s.is_finite())
        .map(clamp_score)
}

/// The AI presence `checks` map, if it is an object.
///
/// This is independent of whether the module has a score.
pub fn ai_presence_checks(detailed: Option<&DetailedAnalysis>) -> Option<&Map<String, Value>> {
    module_field(detailed, ModuleKind::AiPresence, "checks")?.as_object()
}

/// String recommendations attached to a module; anything else is skipped.
pub fn module_recommendations(detailed: Option<&DetailedAnalysis>, kind: ModuleKind) -> Vec<String> {
    module_field(detailed, kind, "recommendations")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Live/absent decision for every module of one payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModuleAvailability {
    live: [bool; 5],
}

impl ModuleAvailability {
    /// Resolves availability for all modules. Total over any input.
    pub fn resolve(detailed: Option<&DetailedAnalysis>) -> Self {
        let mut live = [false; 5];
        for kind in ModuleKind::ALL {
            live[kind.index()] = module_score(detailed, kind).is_some();
        }

        let availability = Self { live };
        tracing::debug!(
            "Module availability: live={:?}",
            availability.live_modules()
        );
        availability
    }

    pub fn is_live(&self, kind: ModuleKind) -> bool {
        self.live[kind.index()]
    }

    /// True when every listed module is live (vacuously true for none).
    pub fn all_live(&self, kinds: &[ModuleKind]) -> bool {
        kinds.iter().all(|kind| self.is_live(*kind))
    }

    pub fn live_modules(&self) -> Vec<ModuleKind> {
        ModuleKind::ALL
            .into_iter()
            .filter(|kind| self.is_live(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detailed(value: Value) -> DetailedAnalysis {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_detailed_analysis_is_all_absent() {
        let availability = ModuleAvailability::resolve(None);
        assert!(availability.live_modules().is_empty());
    }

    #[test]
    fn test_score_must_be_a_number() {
        let d = detailed(json!({
            "ai_presence": {"score": 70},
            "competitor_analysis": {"score": "70"},
            "knowledge_base": {"score": null},
            "answerability": {"message": "no score"},
            "crawler_accessibility": 55
        }));

        let availability = ModuleAvailability::resolve(Some(&d));
        assert_eq!(availability.live_modules(), vec![ModuleKind::AiPresence]);
    }

    #[test]
    fn test_zero_score_is_live() {
        let d = detailed(json!({"competitor_analysis": {"score": 0, "message": "No competitor URLs provided"}}));
        assert_eq!(module_score(Some(&d), ModuleKind::CompetitorAnalysis), Some(0.0));
    }

    #[test]
    fn test_score_is_clamped() {
        let d = detailed(json!({"answerability": {"score": 140}, "knowledge_base": {"score": -3}}));
        assert_eq!(module_score(Some(&d), ModuleKind::Answerability), Some(100.0));
        assert_eq!(module_score(Some(&d), ModuleKind::KnowledgeBase), Some(0.0));
    }

    #[test]
    fn test_checks_are_independent_of_score() {
        let d = detailed(json!({"ai_presence": {"checks": {"robots_gptbot": true}}}));
        assert!(ai_presence_checks(Some(&d)).is_some());
        assert!(module_score(Some(&d), ModuleKind::AiPresence).is_none());

        let d = detailed(json!({"ai_presence": {"score": 50, "checks": [true]}}));
        assert!(ai_presence_checks(Some(&d)).is_none());
    }

    #[test]
    fn test_module_recommendations_skip_non_strings() {
        let d = detailed(json!({"crawler_accessibility": {
            "score": 40,
            "recommendations": ["Add robots.txt file to control AI bot access", 3, null]
        }}));

        assert_eq!(
            module_recommendations(Some(&d), ModuleKind::CrawlerAccessibility),
            vec!["Add robots.txt file to control AI bot access".to_string()]
        );
        assert!(module_recommendations(Some(&d), ModuleKind::KnowledgeBase).is_empty());
    }

    #[test]
    fn test_all_live() {
        let d = detailed(json!({"answerability": {"score": 1}, "knowledge_base": {"score": 2}}));
        let availability = ModuleAvailability::resolve(Some(&d));

        assert!(availability.all_live(&[ModuleKind::Answerability, ModuleKind::KnowledgeBase]));
        assert!(!availability.all_live(&[ModuleKind::Answerability, ModuleKind::AiPresence]));
        assert!(availability.all_live(&[]));
    }
}
