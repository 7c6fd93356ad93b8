//! Placeholder values shown when a module did not produce a measurement.

use serde::{Deserialize, Serialize};

use crate::bot_access::Bot;

/// Fixed placeholder table.
///
/// This is configuration, not a derived value: nothing in the engine infers
/// these numbers from other signals. The engine receives it by value, so tests
/// and alternative deployments can inject their own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackDefaults {
    pub overall: u32,
    pub ai_presence: u32,
    pub competitor_landscape: u32,
    pub chatgpt: u32,
    pub gemini: u32,
    pub claude: u32,
    /// Score for a bot outside [`Bot`]; only used by callers that degrade
    /// instead of rejecting unknown names.
    pub unknown_bot: u32,
    pub answerability: u32,
    pub knowledge_base: u32,
    /// Structured data is always treated as instrumented, so the calculator
    /// never substitutes this value. Kept for display layers that list it.
    pub structured_data: u32,
    pub crawler_access: u32,
}

impl Default for FallbackDefaults {
    fn default() -> Self {
        Self {
            overall: 72,
            ai_presence: 68,
            competitor_landscape: 94,
            chatgpt: 85,
            gemini: 20,
            claude: 100,
            unknown_bot: 50,
            answerability: 46,
            knowledge_base: 100,
            structured_data: 23,
            crawler_access: 50,
        }
    }
}

impl FallbackDefaults {
    /// Placeholder for a bot when the AI presence checks are missing.
    pub fn bot(&self, bot: Bot) -> u32 {
        match bot {
            Bot::ChatGpt => self.chatgpt,
            Bot::Gemini => self.gemini,
            Bot::Claude => self.claude,
        }
    }
}
