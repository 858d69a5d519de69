//! Chat completions client with JSON-schema structured output.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::commit::prompt::SCHEMA_NAME;
use crate::commit::{SYSTEM_INSTRUCTION, build_commit_prompt, parse_commit_message, response_schema};
use crate::config::Settings;
use crate::error::GenerateError;
use crate::llm::MessageGenerator;

const USER_AGENT: &str = concat!("scribe/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    description: &'static str,
    schema: Value,
    strict: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    http: Client,
    settings: Settings,
}

impl OpenAiClient {
    pub fn new(settings: Settings) -> Result<Self, GenerateError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(GenerateError::Request)?;
        Ok(Self { http, settings })
    }

    fn build_request<'a>(&'a self, diff: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_commit_prompt(diff),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: SCHEMA_NAME,
                    description: "The commit message",
                    schema: response_schema(),
                    strict: true,
                },
            },
        }
    }
}

#[async_trait]
impl MessageGenerator for OpenAiClient {
    async fn generate(&self, diff: &str) -> Result<String, GenerateError> {
        let request = self.build_request(diff);
        debug!(
            "Requesting commit message from {} ({} diff bytes)",
            self.settings.model,
            diff.len()
        );

        let response = self
            .http
            .post(self.settings.completions_url())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(GenerateError::Request)?;

        let status = response.status();
        let body = response.text().await.map_err(GenerateError::Request)?;

        if !status.is_success() {
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let chat: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            GenerateError::InvalidJson(format!("Malformed completion response: {}", e))
        })?;

        let message = chat
            .choices
            .into_iter()
            .next()
            .ok_or(GenerateError::NoChoices)?
            .message;

        if let Some(refusal) = message.refusal {
            return Err(GenerateError::Refusal(refusal));
        }

        let content = message.content.unwrap_or_default();
        parse_commit_message(&content)
    }
}

/// Pull the human-readable message out of an API error body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().chars().take(500).collect(),
    }
}
