//! Anthropic-compatible messages adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::{CompletionProfile, Prompt};
use crate::domain::ports::CompletionProvider;

use super::{build_client, truncate_body};

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicCompletionProvider {
    client: reqwest::Client,
}

impl AnthropicCompletionProvider {
    pub fn new(timeout_secs: u64) -> CoreResult<Self> {
        Ok(Self { client: build_client(timeout_secs)? })
    }

    fn api_key(profile: &CompletionProfile) -> CoreResult<String> {
        profile
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| CoreError::Provider {
                status: None,
                message: format!(
                    "no API key for profile '{}'; set ANTHROPIC_API_KEY or configure the profile",
                    profile.name
                ),
            })
    }
}

#[async_trait]
impl CompletionProvider for AnthropicCompletionProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, prompt: &Prompt, profile: &CompletionProfile) -> CoreResult<String> {
        let api_key = Self::api_key(profile)?;
        let url = format!("{}/v1/messages", profile.base_url().trim_end_matches('/'));

        let body = MessagesRequest {
            model: profile.model.clone(),
            max_tokens: profile.max_tokens,
            system: prompt.system.clone(),
            messages: vec![Message { role: "user", content: prompt.user.clone() }],
            temperature: profile.temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Provider {
                status: None,
                message: format!("completion request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(CoreError::Provider {
                status: Some(status.as_u16()),
                message: truncate_body(&body, 500),
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| CoreError::Provider {
            status: None,
            message: format!("failed to parse completion response: {e}"),
        })?;

        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
            })
            .collect();

        if text.is_empty() {
            return Err(CoreError::Provider {
                status: None,
                message: "completion response contained no text blocks".to_string(),
            });
        }

        Ok(text)
    }
}

// -- wire types --

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}
