/// LLM Client — the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through this module.
///
/// Two providers, routed by payload shape: plain-text resumes go to the
/// OpenAI chat-completions API; binary documents (PDF) go to the Anthropic
/// messages API, which accepts base64 document blocks. Models are hardcoded
/// to prevent drift. Calls carry a fixed wall-clock budget and are never
/// retried — failures surface to the caller, who decides whether to resubmit.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-4o";

const MAX_TOKENS: u32 = 4096;
/// Upper wall-clock limit per call; exceeding it is an upstream failure.
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ── Anthropic wire types ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: Vec<RequestBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RequestBlock<'a> {
    Text { text: &'a str },
    Document { source: DocumentSource<'a> },
}

#[derive(Debug, Serialize)]
struct DocumentSource<'a> {
    #[serde(rename = "type")]
    source_type: &'a str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ResponseBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    fn into_text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

// ── OpenAI wire types ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
    content: Option<String>,
}

/// The single LLM client used by all services.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    anthropic_api_key: String,
    openai_api_key: String,
}

impl LlmClient {
    pub fn new(anthropic_api_key: String, openai_api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            anthropic_api_key,
            openai_api_key,
        }
    }

    /// Completes a text prompt via OpenAI chat completions.
    pub async fn complete_text(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = OpenAiRequest {
            model: OPENAI_MODEL,
            messages: vec![
                OpenAiMessage {
                    role: "system",
                    content: system,
                },
                OpenAiMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.openai_api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let parsed: OpenAiResponse = response.json().await?;
        debug!("OpenAI call succeeded ({} choices)", parsed.choices.len());

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    /// Completes a prompt over a base64-encoded binary document via the
    /// Anthropic messages API.
    pub async fn complete_document(
        &self,
        system: &str,
        prompt: &str,
        media_type: &str,
        base64_data: &str,
    ) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: ANTHROPIC_MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: vec![
                    RequestBlock::Text { text: prompt },
                    RequestBlock::Document {
                        source: DocumentSource {
                            source_type: "base64",
                            media_type,
                            data: base64_data,
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.anthropic_api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let parsed: AnthropicResponse = response.json().await?;
        debug!(
            "Anthropic call succeeded: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );

        parsed.into_text().ok_or(LlmError::EmptyContent)
    }
}

fn api_error(status: u16, body: String) -> LlmError {
    // Both providers use an {"error": {"message": ...}} shape
    let message = serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_extracts_provider_message() {
        let body = r#"{"error": {"message": "overloaded", "type": "api_error"}}"#;
        let err = api_error(529, body.to_string());
        let LlmError::Api { status, message } = err else {
            panic!("expected api error");
        };
        assert_eq!(status, 529);
        assert_eq!(message, "overloaded");
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(502, "bad gateway".to_string());
        let LlmError::Api { message, .. } = err else {
            panic!("expected api error");
        };
        assert_eq!(message, "bad gateway");
    }

    #[test]
    fn test_document_request_serializes_content_blocks() {
        let request = AnthropicRequest {
            model: ANTHROPIC_MODEL,
            max_tokens: MAX_TOKENS,
            system: "sys",
            messages: vec![AnthropicMessage {
                role: "user",
                content: vec![
                    RequestBlock::Text { text: "parse this" },
                    RequestBlock::Document {
                        source: DocumentSource {
                            source_type: "base64",
                            media_type: "application/pdf",
                            data: "QUJD",
                        },
                    },
                ],
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        let blocks = &json["messages"][0]["content"];
        assert_eq!(blocks[0]["type"], "text");
        assert_eq!(blocks[1]["type"], "document");
        assert_eq!(blocks[1]["source"]["media_type"], "application/pdf");
        assert_eq!(blocks[1]["source"]["data"], "QUJD");
    }
}
