use serde::{Deserialize, Serialize};
use std::fmt;

/// LLM API configuration for the utterance classifier backend.
#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClassifierLlmConfig {
    /// Enable LLM-backed classification; the rule classifier is used otherwise.
    pub enabled: bool,
    /// OpenAI-compatible API base URL.
    ///
    /// Examples:
    /// - OpenAI:       https://api.openai.com/v1
    /// - Groq:         https://api.groq.com/openai/v1
    /// - Local Ollama: http://localhost:11434/v1
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Comma-separated model list for failover.
    ///
    /// First model is primary; on 429/quota exhaustion, auto-switch to next.
    pub models: String,
}

impl ClassifierLlmConfig {
    pub fn is_default(&self) -> bool {
        !self.enabled
            && self.base_url.is_empty()
            && self.api_key.is_empty()
            && self.models.is_empty()
    }

    pub fn redacted_api_key(&self) -> String {
        mask_api_key(&self.api_key)
    }
}

impl fmt::Debug for ClassifierLlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierLlmConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("api_key", &self.redacted_api_key())
            .field("models", &self.models)
            .finish()
    }
}

impl fmt::Display for ClassifierLlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "enabled={}, base_url=\"{}\", api_key=\"{}\", models=\"{}\"",
            self.enabled,
            self.base_url,
            self.redacted_api_key(),
            self.models
        )
    }
}

fn mask_api_key(api_key: &str) -> String {
    if api_key.is_empty() {
        return String::new();
    }

    let char_count = api_key.chars().count();
    let prefix: String = api_key.chars().take(3).collect();
    let suffix: String = api_key.chars().skip(char_count.saturating_sub(4)).collect();

    if char_count <= 4 {
        format!("***{suffix}")
    } else {
        format!("{prefix}...{suffix}")
    }
}
