//! Per-bot accessibility scores derived from robots directives.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::defaults::FallbackDefaults;
use crate::errors::AppError;

/// Score for a crawler explicitly allowed by robots directives.
pub const ALLOWED_SCORE: u32 = 85;
/// Score for a crawler explicitly blocked.
pub const BLOCKED_SCORE: u32 = 20;
/// Score when robots has no rule for the crawler (default-allow).
pub const UNSPECIFIED_SCORE: u32 = 50;

/// AI assistants whose crawler access is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bot {
    ChatGpt,
    Gemini,
    Claude,
}

impl Bot {
    pub const ALL: [Bot; 3] = [Bot::ChatGpt, Bot::Gemini, Bot::Claude];

    /// Crawler user-agent token, lowercase.
    pub fn agent(self) -> &'static str {
        match self {
            Bot::ChatGpt => "gptbot",
            Bot::Gemini => "google-extended",
            Bot::Claude => "claudebot",
        }
    }

    /// Key of the directive flag inside the AI presence `checks` map.
    pub fn directive_key(self) -> String {
        format!("robots_{}", self.agent())
    }

    pub fn label(self) -> &'static str {
        match self {
            Bot::ChatGpt => "ChatGPT",
            Bot::Gemini => "Gemini",
            Bot::Claude => "Claude",
        }
    }
}

impl fmt::Display for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Bot {
    type Err = AppError;

    /// Accepts the assistant name or its crawler agent, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chatgpt" | "chat_gpt" | "gptbot" => Ok(Bot::ChatGpt),
            "gemini" | "google-extended" => Ok(Bot::Gemini),
            "claude" | "claudebot" => Ok(Bot::Claude),
            other => Err(AppError::BadRequest(format!(
                "Unknown bot '{}'; expected one of chatgpt, gemini, claude",
                other
            ))),
        }
    }
}

/// What the robots checks say about one crawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Allowed,
    Blocked,
    Unspecified,
}

impl Directive {
    /// Reads the flag for `bot`, matching the key case-insensitively.
    ///
    /// Non-boolean values carry no directive and count as unspecified.
    pub fn lookup(checks: &Map<String, Value>, bot: Bot) -> Self {
        let key = bot.directive_key();
        let flag = checks
            .get(&key)
            .or_else(|| {
                checks
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(&key))
                    .map(|(_, v)| v)
            })
            .and_then(Value::as_bool);

        match flag {
            Some(true) => Directive::Allowed,
            Some(false) => Directive::Blocked,
            None => Directive::Unspecified,
        }
    }

    pub fn score(self) -> u32 {
        match self {
            Directive::Allowed => ALLOWED_SCORE,
            Directive::Blocked => BLOCKED_SCORE,
            Directive::Unspecified => UNSPECIFIED_SCORE,
        }
    }
}

/// Scores crawler access per bot.
#[derive(Debug, Clone, Copy)]
pub struct BotAccessScorer {
    defaults: FallbackDefaults,
}

impl BotAccessScorer {
    pub fn new(defaults: FallbackDefaults) -> Self {
        Self { defaults }
    }

    /// Score for `bot`; falls back to the fixed table when `checks` is missing.
    pub fn score(&self, bot: Bot, checks: Option<&Map<String, Value>>) -> u32 {
        match checks {
            Some(checks) => Directive::lookup(checks, bot).score(),
            None => self.defaults.bot(bot),
        }
    }

    /// Scores a bot given by name. Unknown names are rejected.
    pub fn score_by_name(
        &self,
        name: &str,
        checks: Option<&Map<String, Value>>,
    ) -> Result<u32, AppError> {
        let bot: Bot = name.parse()?;
        Ok(self.score(bot, checks))
    }
}
