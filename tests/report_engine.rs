/// End-to-end checks of the report engine on realistic payloads
/// Covers placeholder substitution, provenance tagging and export behaviour
use aeo_report_api::bot_access::{Bot, BotAccessScorer};
use aeo_report_api::defaults::FallbackDefaults;
use aeo_report_api::errors::AppError;
use aeo_report_api::export::ExportRow;
use aeo_report_api::models::AnalysisResult;
use aeo_report_api::provenance::{Metric, Provenance};
use aeo_report_api::report::{ReportEngine, ReportModel, ReportStatus};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

fn evaluate(value: Value) -> ReportModel {
    ReportEngine::default().evaluate(Some(&AnalysisResult::from_value(&value)))
}

fn tagged(report: &ReportModel, metric: Metric) -> (u32, Provenance) {
    let m = report.metric(metric);
    (m.value, m.provenance)
}

/// A complete run as the analysis service returns it
fn full_payload() -> Value {
    json!({
        "success": true,
        "url": "https://yogreet.com",
        "overall_score": 74.6,
        "grade": "B",
        "structured_data": {
            "total_schemas": 3,
            "valid_schemas": 2,
            "invalid_schemas": 1,
            "schema_types": ["Organization", "WebSite", "FAQPage"],
            "coverage_score": 66.7,
            "quality_score": 80,
            "completeness_score": 70,
            "seo_relevance_score": 55
        },
        "detailed_analysis": {
            "ai_presence": {
                "score": 82,
                "checks": {
                    "has_llms_txt": false,
                    "robots_gptbot": true,
                    "robots_google-extended": false,
                    "robots_claudebot": true
                }
            },
            "competitor_analysis": {"score": 58, "competitors": ["a.com", "b.com"]},
            "knowledge_base": {"score": 71, "entities": ["Yoga", "Greeting cards"]},
            "answerability": {
                "score": 64,
                "qa_pairs": [{"question": "What is Yogreet?", "answer": "A card shop."}]
            },
            "crawler_accessibility": {
                "score": 90,
                "robots_analysis": {"robots_txt_present": true, "sitemap_present": true}
            }
        },
        "recommendations": ["Add FAQPage schema"],
        "errors": [],
        "warnings": ["Sitemap lists 3 URLs returning 404"],
        "analysis_timestamp": "2026-10-14T18:22:05Z"
    })
}

#[test]
fn test_all_modules_absent_overall_is_static_placeholder() {
    let report = evaluate(json!({"url": "https://a.com"}));

    assert_eq!(tagged(&report, Metric::Overall), (72, Provenance::Static));
    assert_eq!(report.status, ReportStatus::Evaluated);
    assert!(report.live_modules.is_empty());
}

#[test]
fn test_empty_detailed_analysis_uses_placeholders() {
    let report = evaluate(json!({"url": "https://a.com", "detailed_analysis": {}}));

    assert_eq!(tagged(&report, Metric::Overall), (72, Provenance::Static));
    assert_eq!(tagged(&report, Metric::AiPresence), (68, Provenance::Static));
    assert_eq!(tagged(&report, Metric::CompetitorLandscape), (94, Provenance::Static));
    assert_eq!(tagged(&report, Metric::StrategyReview), (0, Provenance::Static));
}

#[test]
fn test_gptbot_allowed_is_live() {
    let report = evaluate(json!({
        "detailed_analysis": {"ai_presence": {"score": 50, "checks": {"robots_gptbot": true}}}
    }));
    assert_eq!(tagged(&report, Metric::ChatGpt), (85, Provenance::Live));
}

#[test]
fn test_gptbot_blocked_scores_low() {
    let report = evaluate(json!({
        "detailed_analysis": {"ai_presence": {"score": 50, "checks": {"robots_gptbot": false}}}
    }));
    assert_eq!(tagged(&report, Metric::ChatGpt), (20, Provenance::Live));
}

#[test]
fn test_bots_without_checks_are_static_defaults() {
    let report = evaluate(json!({"detailed_analysis": {"ai_presence": {"score": 50}}}));

    assert_eq!(tagged(&report, Metric::AiPresence), (50, Provenance::Live));
    assert_eq!(tagged(&report, Metric::ChatGpt), (85, Provenance::Static));
    assert_eq!(tagged(&report, Metric::Gemini), (20, Provenance::Static));
    assert_eq!(tagged(&report, Metric::Claude), (100, Provenance::Static));
}

#[test]
fn test_strategy_review_penalises_missing_categories() {
    let report = evaluate(json!({"detailed_analysis": {"answerability": {"score": 80}}}));

    assert_eq!(tagged(&report, Metric::StrategyReview), (20, Provenance::Static));
    assert_eq!(tagged(&report, Metric::Answerability), (80, Provenance::Live));
}

#[test]
fn test_structured_data_composite() {
    let report = evaluate(json!({
        "structured_data": {"coverage_score": 90, "quality_score": 80, "completeness_score": 70}
    }));
    assert_eq!(tagged(&report, Metric::StructuredData), (80, Provenance::Live));
}

#[test]
fn test_full_run_is_live_everywhere() {
    let report = evaluate(full_payload());

    for metric in Metric::ALL {
        assert_eq!(
            report.metric(metric).provenance,
            Provenance::Live,
            "{:?} should be live",
            metric
        );
    }
    assert_eq!(report.metric(Metric::Overall).value, 75);
    assert_eq!(report.metric(Metric::Gemini).value, 20);
    assert_eq!(report.metric(Metric::Claude).value, 85);
    // (64 + 71 + 72.23 + 90) / 4 = 74.31
    assert_eq!(report.metric(Metric::StrategyReview).value, 74);
    assert_eq!(report.grade, "B");
    assert_eq!(report.live_modules.len(), 5);
}

#[test]
fn test_malformed_modules_count_as_absent() {
    let report = evaluate(json!({
        "overall_score": "eighty",
        "structured_data": "not a record",
        "detailed_analysis": {
            "ai_presence": {"score": "high", "checks": {"robots_gptbot": true}},
            "competitor_analysis": [],
            "knowledge_base": null,
            "answerability": {"score": null},
            "crawler_accessibility": {"score": 140}
        }
    }));

    assert_eq!(tagged(&report, Metric::Overall), (72, Provenance::Static));
    assert_eq!(tagged(&report, Metric::AiPresence), (68, Provenance::Static));
    assert_eq!(tagged(&report, Metric::ChatGpt), (85, Provenance::Static));
    assert_eq!(tagged(&report, Metric::CompetitorLandscape), (94, Provenance::Static));
    assert_eq!(tagged(&report, Metric::KnowledgeBase), (100, Provenance::Static));
    assert_eq!(tagged(&report, Metric::Answerability), (46, Provenance::Static));
    // Out-of-range scores are clamped, not rejected
    assert_eq!(tagged(&report, Metric::CrawlerAccess), (100, Provenance::Live));
    assert_eq!(report.live_modules.len(), 1);
}

#[test]
fn test_missing_input_yields_empty_model() {
    let report = ReportEngine::default().evaluate(None);

    assert_eq!(report.status, ReportStatus::Empty);
    assert_eq!(tagged(&report, Metric::Overall), (72, Provenance::Static));
    assert_eq!(tagged(&report, Metric::StructuredData), (0, Provenance::Live));
    assert!(report.recommendations.is_empty());
}

#[test]
fn test_evaluation_is_idempotent() {
    let engine = ReportEngine::default();
    let result = AnalysisResult::from_value(&full_payload());

    assert_eq!(engine.evaluate(Some(&result)), engine.evaluate(Some(&result)));
}

#[test]
fn test_custom_defaults_are_used() {
    let defaults = FallbackDefaults {
        overall: 10,
        ..FallbackDefaults::default()
    };
    let engine = ReportEngine::new(defaults, Default::default());
    let report = engine.evaluate(Some(&AnalysisResult::default()));

    assert_eq!(report.metric(Metric::Overall).value, 10);
    assert_eq!(report.grade, "F");
}

#[test]
fn test_export_row_for_missing_competitor_is_empty() {
    let mut payload = full_payload();
    payload["detailed_analysis"]
        .as_object_mut()
        .unwrap()
        .remove("competitor_analysis");
    let report = evaluate(payload);
    let exported_at = Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap();
    let row = ExportRow::from_report(&report, exported_at);

    assert_eq!(row.competitor_analysis, None);
    let record = row.to_csv_record();
    let fields: Vec<&str> = record.split(',').collect();
    assert_eq!(fields[4], "");
    assert_ne!(fields[4], "0");
}

#[test]
fn test_unknown_bot_name_is_rejected() {
    let scorer = BotAccessScorer::new(FallbackDefaults::default());

    assert!(matches!(
        scorer.score_by_name("perplexitybot", None),
        Err(AppError::BadRequest(_))
    ));
    assert_eq!(scorer.score_by_name("Claude", None).unwrap(), 100);
    assert_eq!("gemini".parse::<Bot>().unwrap(), Bot::Gemini);
}

#[test]
fn test_report_serializes_tags() {
    let report = evaluate(json!({"detailed_analysis": {"knowledge_base": {"score": 33}}}));
    let value = serde_json::to_value(&report).unwrap();
    let kb = value["metrics"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["metric"] == "knowledge_base")
        .unwrap();

    assert_eq!(kb["value"], 33);
    assert_eq!(kb["provenance"], "live");
    assert_eq!(kb["label"], "Knowledge Base");
}
