//! Completion-provider profiles.
//!
//! A profile is the explicit configuration object passed into the answer
//! composer per call. The caller selects the profile; the core never reads
//! provider settings from ambient global state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recognized provider wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI-style `/chat/completions` endpoint (also local servers that
    /// speak the same protocol).
    OpenaiCompatible,
    /// Anthropic-style `/v1/messages` endpoint.
    AnthropicCompatible,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenaiCompatible => "openai_compatible",
            Self::AnthropicCompatible => "anthropic_compatible",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "openai_compatible" => Some(Self::OpenaiCompatible),
            "anthropic_compatible" => Some(Self::AnthropicCompatible),
            _ => None,
        }
    }

    /// Default API base URL for this wire format.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenaiCompatible => "https://api.openai.com/v1",
            Self::AnthropicCompatible => "https://api.anthropic.com",
        }
    }
}

/// A named completion-provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionProfile {
    pub name: String,
    pub kind: ProviderKind,

    /// API base URL. Empty falls back to the kind's default.
    #[serde(default)]
    pub base_url: String,

    /// API key. `None` falls back to the conventional env var at call time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub model: String,

    /// Upper bound on generated tokens.
    pub max_tokens: u32,

    /// Sampling temperature, if the caller wants to override the provider
    /// default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for CompletionProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            kind: ProviderKind::OpenaiCompatible,
            base_url: String::new(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: None,
        }
    }
}

impl CompletionProfile {
    /// Base URL with the kind default applied.
    pub fn base_url(&self) -> &str {
        if self.base_url.is_empty() {
            self.kind.default_base_url()
        } else {
            &self.base_url
        }
    }
}

/// A stored provider profile, as persisted for the settings UI. Treated as
/// opaque key-value data; not part of the indexing core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfigRecord {
    pub id: Uuid,
    pub name: String,
    pub kind: ProviderKind,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ApiConfigRecord {
    /// Materialize a completion profile from the stored record, filling gaps
    /// from `fallback`.
    pub fn to_profile(&self, fallback: &CompletionProfile) -> CompletionProfile {
        CompletionProfile {
            name: self.name.clone(),
            kind: self.kind,
            base_url: self.base_url.clone().unwrap_or_default(),
            api_key: self.api_key.clone().or_else(|| fallback.api_key.clone()),
            model: self.model.clone().unwrap_or_else(|| fallback.model.clone()),
            max_tokens: fallback.max_tokens,
            temperature: fallback.temperature,
        }
    }
}
