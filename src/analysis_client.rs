use crate::errors::AppError;
use crate::models::{AnalyzeRequest, RunListing, RunSummary};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Client for the upstream analysis service.
///
/// Requests are sent once; there is no retry. A single request timeout is
/// applied by the underlying HTTP client.
#[derive(Clone)]
pub struct AnalysisServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisServiceClient {
    /// Creates a new `AnalysisServiceClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the analysis service.
    /// * `timeout` - Per-request timeout.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create analysis client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests a fresh analysis of `url`.
    ///
    /// # Returns
    ///
    /// * `Result<Value, AppError>` - The raw analysis payload, exactly as received.
    pub async fn analyze(&self, url: &str) -> Result<Value, AppError> {
        let endpoint = format!("{}/api/analyze", self.base_url);
        tracing::info!("Requesting analysis for {}", url);

        let response = self
            .client
            .post(&endpoint)
            .json(&AnalyzeRequest {
                url: url.to_string(),
            })
            .send()
            .await
            .map_err(|e| transport_error("Analysis request failed", e))?;

        let payload = read_payload(response).await?;
        tracing::info!("✓ Analysis received for {}", url);
        Ok(payload)
    }

    /// Fetches the run-history listing, most recent first as ordered upstream.
    pub async fn list_runs(&self) -> Result<Vec<RunSummary>, AppError> {
        let endpoint = format!("{}/api/runs", self.base_url);
        tracing::info!("Fetching run history");

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| transport_error("Run history request failed", e))?;

        let payload = read_payload(response).await?;
        let listing: RunListing = serde_json::from_value(payload).map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse run history: {}", e))
        })?;

        let runs = listing.into_runs();
        tracing::debug!("Run history returned {} run(s)", runs.len());
        Ok(runs)
    }

    /// Fetches the stored analysis payload of one run.
    pub async fn get_run(&self, id: &str) -> Result<Value, AppError> {
        let mut endpoint = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AppError::InternalError(format!("Invalid analysis base URL: {}", e)))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| AppError::InternalError("Analysis base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["api", "runs", id]);

        tracing::info!("Fetching run {}", id);

        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| transport_error("Run request failed", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Run {} not found", id)));
        }

        read_payload(response).await
    }
}

fn transport_error(what: &str, err: reqwest::Error) -> AppError {
    match AppError::from(err) {
        AppError::ExternalApiError(msg) => {
            tracing::error!("{}: {}", what, msg);
            AppError::ExternalApiError(format!("{}: {}", what, msg))
        }
        other => other,
    }
}

/// Reads a JSON body, turning error statuses and `{success: false}` bodies
/// into `ExternalApiError` with the service's own message when it has one.
async fn read_payload(response: Response) -> Result<Value, AppError> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<Value>(&error_text)
            .ok()
            .and_then(|body| service_error(&body))
            .unwrap_or(error_text);
        tracing::error!("Analysis service returned {}: {}", status, message);
        return Err(AppError::ExternalApiError(format!(
            "Analysis service returned {}: {}",
            status, message
        )));
    }

    let payload: Value = response.json().await.map_err(|e| {
        AppError::ExternalApiError(format!("Failed to parse analysis service response: {}", e))
    })?;

    if payload.get("success").and_then(Value::as_bool) == Some(false) {
        let message = service_error(&payload).unwrap_or_else(|| "Analysis failed".to_string());
        tracing::warn!("Analysis service reported failure: {}", message);
        return Err(AppError::ExternalApiError(message));
    }

    Ok(payload)
}

fn service_error(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Prepends `https://` when no scheme is given and validates the result.
pub fn normalize_target_url(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("URL is required".to_string()));
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = url::Url::parse(&candidate)
        .map_err(|e| AppError::BadRequest(format!("Invalid URL '{}': {}", trimmed, e)))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AppError::BadRequest(format!("URL '{}' has no host", trimmed)));
    }

    Ok(candidate)
}
