//! OpenAI-compatible chat completion adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{CoreError, CoreResult};
use crate::domain::models::{CompletionProfile, Prompt};
use crate::domain::ports::CompletionProvider;

use super::{build_client, truncate_body};

pub struct OpenAiCompletionProvider {
    client: reqwest::Client,
}

impl OpenAiCompletionProvider {
    pub fn new(timeout_secs: u64) -> CoreResult<Self> {
        Ok(Self { client: build_client(timeout_secs)? })
    }

    fn api_key(profile: &CompletionProfile) -> CoreResult<String> {
        profile
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| CoreError::Provider {
                status: None,
                message: format!(
                    "no API key for profile '{}'; set OPENAI_API_KEY or configure the profile",
                    profile.name
                ),
            })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &Prompt, profile: &CompletionProfile) -> CoreResult<String> {
        let api_key = Self::api_key(profile)?;
        let url = format!("{}/chat/completions", profile.base_url().trim_end_matches('/'));

        let body = ChatRequest {
            model: profile.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: prompt.system.clone() },
                ChatMessage { role: "user", content: prompt.user.clone() },
            ],
            max_tokens: profile.max_tokens,
            temperature: profile.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
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

        let parsed: ChatResponse = response.json().await.map_err(|e| CoreError::Provider {
            status: None,
            message: format!("failed to parse completion response: {e}"),
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CoreError::Provider {
                status: None,
                message: "completion response contained no choices".to_string(),
            })
    }
}

// -- wire types --

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(base_url: &str) -> CompletionProfile {
        CompletionProfile {
            base_url: base_url.to_string(),
            api_key: Some("sk-test".to_string()),
            ..CompletionProfile::default()
        }
    }

    #[tokio::test]
    async fn complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "The sky is blue."}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = OpenAiCompletionProvider::new(5).unwrap();
        let prompt = Prompt { system: "sys".to_string(), user: "what color is the sky".to_string() };

        let answer = provider.complete(&prompt, &profile(&server.url())).await.unwrap();
        assert_eq!(answer, "The sky is blue.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn request_carries_model_and_messages() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"content": "hi"}}]}).to_string())
            .create_async()
            .await;

        let provider = OpenAiCompletionProvider::new(5).unwrap();
        let prompt = Prompt { system: "sys".to_string(), user: "hello".to_string() };
        provider.complete(&prompt, &profile(&server.url())).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upstream_error_propagates_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let provider = OpenAiCompletionProvider::new(5).unwrap();
        let prompt = Prompt { system: String::new(), user: "q".to_string() };
        let err = provider.complete(&prompt, &profile(&server.url())).await.unwrap_err();

        match &err {
            CoreError::Provider { status, message } => {
                assert_eq!(*status, Some(500));
                assert!(message.contains("internal error"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_transient());
    }
}
