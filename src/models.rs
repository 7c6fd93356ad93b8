use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::availability::ModuleKind;

// ============ Upstream Analysis Payload ============

/// Top-level payload returned by the analysis service for one URL.
///
/// Every field is optional and read leniently: a wrong-typed field is treated
/// as absent instead of failing the whole payload. Unknown fields are kept in
/// `extra` so the payload can be re-emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Analysed URL.
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Overall score computed upstream.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    /// Letter grade computed upstream (e.g. "A+", "C").
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    /// Top-level recommendations.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub recommendations: Vec<String>,
    /// Recommendations already merged across modules by the service.
    #[serde(default, deserialize_with = "lenient::optional_string_list", skip_serializing_if = "Option::is_none")]
    pub all_recommendations: Option<Vec<String>>,
    /// Analysis errors.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub errors: Vec<String>,
    /// Analysis warnings.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub warnings: Vec<String>,
    /// Structured-data metrics.
    #[serde(default, deserialize_with = "lenient::record", skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<StructuredDataSummary>,
    /// Per-module results.
    #[serde(default, deserialize_with = "lenient::record", skip_serializing_if = "Option::is_none")]
    pub detailed_analysis: Option<DetailedAnalysis>,
    /// When the upstream finished the analysis.
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub analysis_timestamp: Option<String>,
    /// Any additional fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    /// Reads a payload from raw JSON.
    ///
    /// Never fails: anything that is not a JSON object yields an empty result.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            tracing::warn!("Analysis payload is not a JSON object; treating it as empty");
            return Self::default();
        }

        match serde_json::from_value(value.clone()) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Analysis payload could not be read ({}); treating it as empty", e);
                Self::default()
            }
        }
    }
}

/// Structured-data metrics plus listing metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDataSummary {
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub coverage_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub completeness_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub seo_relevance_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub total_schemas: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub valid_schemas: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub invalid_schemas: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub schema_types: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Container for the five optional analysis modules.
///
/// Modules are kept as raw JSON; whether one counts as present is decided
/// solely by [`crate::availability`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_presence: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_analysis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answerability: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawler_accessibility: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DetailedAnalysis {
    /// Raw container for a module, if the key exists and is not null.
    pub fn module(&self, kind: ModuleKind) -> Option<&Value> {
        let raw = match kind {
            ModuleKind::AiPresence => self.ai_presence.as_ref(),
            ModuleKind::CompetitorAnalysis => self.competitor_analysis.as_ref(),
            ModuleKind::KnowledgeBase => self.knowledge_base.as_ref(),
            ModuleKind::Answerability => self.answerability.as_ref(),
            ModuleKind::CrawlerAccessibility => self.crawler_accessibility.as_ref(),
        };
        raw.filter(|v| !v.is_null())
    }
}

// ============ Run History ============

/// One entry of the run-history listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub grade: Option<String>,
}

/// The history endpoint answers either with a bare list or wrapped in `runs`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RunListing {
    Bare(Vec<RunSummary>),
    Wrapped { runs: Vec<RunSummary> },
}

impl RunListing {
    pub fn into_runs(self) -> Vec<RunSummary> {
        match self {
            RunListing::Bare(runs) => runs,
            RunListing::Wrapped { runs } => runs,
        }
    }
}

// ============ API Request/Response Models ============

/// Request payload for analysing a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// URL to analyse; `https://` is assumed when no scheme is given.
    pub url: String,
}

/// Lenient field readers: wrong-typed values become "absent".
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| v.as_f64()).filter(|n| n.is_finite()))
    }

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    pub fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "run id must be a string or number, got {}",
                other
            ))),
        }
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(optional_string_list(deserializer)?.unwrap_or_default())
    }

    pub fn optional_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        })
    }

    pub fn record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .filter(Value::is_object)
            .and_then(|v| serde_json::from_value(v).ok()))
    }
}
