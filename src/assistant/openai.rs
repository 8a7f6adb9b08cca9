use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AssistantConfig;

use super::AssistantError;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`AssistantError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &AssistantConfig, api_key: String) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Sends one system + user exchange and returns the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Http`] on transport failures, non-success
    /// status codes, or an unparseable body.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Result<Option<String>, AssistantError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let completion: ChatCompletion = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let config = AssistantConfig {
            api_base: "http://localhost:8080/v1/".to_string(),
            ..AssistantConfig::default()
        };
        let client = OpenAiClient::new(&config, "k".to_string()).expect("client should build");
        assert_eq!(client.endpoint, "http://localhost:8080/v1/chat/completions");
        assert!(!format!("{client:?}").contains("\"k\""));
    }

    #[test]
    fn request_body_matches_wire_format() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                Message {
                    role: "system",
                    content: "s",
                },
                Message {
                    role: "user",
                    content: "u",
                },
            ],
            temperature: 0.5,
            max_tokens: 500,
        };
        let json = serde_json::to_value(&body).expect("should serialise");
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn completion_without_choices_yields_none() {
        let c: ChatCompletion = serde_json::from_str("{}").expect("should parse");
        assert!(c.choices.is_empty());
    }
}
