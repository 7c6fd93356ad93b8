use serde::Deserialize;

use crate::report::PanelToggles;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub analysis_api_base_url: String,
    pub analysis_api_timeout_secs: u64,
    pub show_module_details: bool,
    pub show_crawl_status: bool,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            analysis_api_base_url: std::env::var("ANALYSIS_API_BASE_URL")
                .map_err(|_| anyhow::anyhow!("ANALYSIS_API_BASE_URL environment variable required"))
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("ANALYSIS_API_BASE_URL cannot be empty");
                    }
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("ANALYSIS_API_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.trim_end_matches('/').to_string())
                })?,
            analysis_api_timeout_secs: std::env::var("ANALYSIS_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("ANALYSIS_API_TIMEOUT_SECS must be a whole number of seconds"))
                .and_then(|secs: u64| {
                    if secs == 0 {
                        anyhow::bail!("ANALYSIS_API_TIMEOUT_SECS must be greater than zero");
                    }
                    Ok(secs)
                })?,
            show_module_details: parse_flag("SHOW_MODULE_DETAILS")?,
            show_crawl_status: parse_flag("SHOW_CRAWL_STATUS")?,
            rate_limit_per_second: std::env::var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a valid number"))?,
            rate_limit_burst: std::env::var("RATE_LIMIT_BURST")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_BURST must be a valid number"))?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Analysis API Base URL: {}", config.analysis_api_base_url);
        tracing::debug!(
            "Analysis API timeout: {}s",
            config.analysis_api_timeout_secs
        );
        tracing::debug!(
            "Panels: module details={}, crawl status={}",
            config.show_module_details,
            config.show_crawl_status
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Rendering toggles handed to the report engine.
    pub fn panel_toggles(&self) -> PanelToggles {
        PanelToggles {
            show_module_details: self.show_module_details,
            show_crawl_status: self.show_crawl_status,
        }
    }
}

/// Panel toggles alone, for tools that never talk to the analysis service.
pub fn panel_toggles_from_env() -> anyhow::Result<PanelToggles> {
    dotenvy::dotenv().ok();
    Ok(PanelToggles {
        show_module_details: parse_flag("SHOW_MODULE_DETAILS")?,
        show_crawl_status: parse_flag("SHOW_CRAWL_STATUS")?,
    })
}

/// Reads a boolean toggle, treating an unset variable as off.
fn parse_flag(name: &str) -> anyhow::Result<bool> {
    match std::env::var(name) {
        Err(_) => Ok(false),
        Ok(raw) => parse_flag_value(&raw)
            .ok_or_else(|| anyhow::anyhow!("{} must be one of true/false/1/0/yes/no/on/off", name)),
    }
}

fn parse_flag_value(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Some(false),
        "1" | "true" | "yes" | "on" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert_eq!(parse_flag_value("true"), Some(true));
        assert_eq!(parse_flag_value(" ON "), Some(true));
        assert_eq!(parse_flag_value("1"), Some(true));
        assert_eq!(parse_flag_value("off"), Some(false));
        assert_eq!(parse_flag_value(""), Some(false));
        assert_eq!(parse_flag_value("maybe"), None);
    }

    #[test]
    fn test_panel_toggles_follow_config() {
        let config = Config {
            port: 3000,
            analysis_api_base_url: "http://localhost:5000".to_string(),
            analysis_api_timeout_secs: 60,
            show_module_details: true,
            show_crawl_status: false,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        };

        let toggles = config.panel_toggles();
        assert!(toggles.show_module_details);
        assert!(!toggles.show_crawl_status);
    }
}
