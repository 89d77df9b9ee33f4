//! OpenAI-compatible chat completions client.
//!
//! Groq follows the same `/chat/completions` format as OpenAI; one
//! implementation covers any provider that speaks it.

use super::ChatProvider;
use crate::error::DraftingError;
use crate::providers::{build_provider_client, scrub::api_failure};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Every completion is issued at temperature 0. The user-facing creativity
/// knob is recorded on the query and shown in output, but not forwarded
/// here; known behavior, kept as-is.
const DRAFT_TEMPERATURE: f32 = 0.0;

pub struct OpenAiCompatibleClient {
    name: String,
    model: String,
    /// `Authorization` header value, formatted once at build time.
    auth_header: String,
    /// Chat completions endpoint, joined to the base URL once at build time.
    chat_url: String,
    client: Client,
}

impl OpenAiCompatibleClient {
    pub fn new(name: &str, base_url: &str, api_key: &str, model: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let chat_url = if base_url.ends_with("chat/completions") {
            base_url.to_string()
        } else {
            format!("{base_url}/chat/completions")
        };

        Self {
            name: name.to_string(),
            model: model.to_string(),
            auth_header: format!("Bearer {api_key}"),
            chat_url,
            client: build_provider_client(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// First choice's text. `None` for missing choices, null content, or an
/// empty string; all of them count as the provider producing no answer.
fn extract_text(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.is_empty())
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, DraftingError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: DRAFT_TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.chat_url)
            .header("Authorization", &self.auth_header)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = api_failure(response).await;
            return Err(DraftingError::Api { status, message });
        }

        let body = response.text().await?;
        let decoded: ChatResponse =
            serde_json::from_str(&body).map_err(|e| DraftingError::Decode(e.to_string()))?;

        extract_text(decoded).ok_or_else(|| DraftingError::EmptyCompletion {
            model: self.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(base_url: &str) -> OpenAiCompatibleClient {
        OpenAiCompatibleClient::new("groq", base_url, "gsk_test_key", "llama3-70b-8192")
    }

    #[test]
    fn builds_chat_completions_url() {
        let client = make_client("https://api.groq.com/openai/v1");
        assert_eq!(
            client.chat_url,
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn does_not_double_chat_completions_suffix() {
        let client = make_client("https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(
            client.chat_url,
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn request_serializes_a_single_user_message() {
        let request = ChatRequest {
            model: "llama3-70b-8192",
            messages: vec![Message {
                role: "user",
                content: "filled prompt".into(),
            }],
            temperature: 0.0,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("llama3-70b-8192"));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"temperature\":0.0"));
    }

    #[tokio::test]
    async fn complete_extracts_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer gsk_test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {"message": {"content": "Drafted answer."}},
                    {"message": {"content": "ignored second choice"}},
                ]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server.uri());
        let answer = client.complete("prompt").await.unwrap();
        assert_eq!(answer, "Drafted answer.");
    }

    #[tokio::test]
    async fn completion_is_always_requested_at_temperature_zero() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "llama3-70b-8192",
                "temperature": 0.0,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server.uri());
        client.complete("prompt").await.unwrap();
    }

    #[tokio::test]
    async fn api_errors_carry_status_and_scrubbed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string(
                r#"{"error":"rate limited","api_key":"gsk_raw_secret_123"}"#,
            ))
            .mount(&server)
            .await;

        let client = make_client(&server.uri());
        let err = client.complete("prompt").await.unwrap_err();

        match err {
            DraftingError::Api { status, message } => {
                assert_eq!(status, 429);
                assert!(!message.contains("gsk_raw_secret_123"));
                assert!(message.contains("[REDACTED]"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_empty_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = make_client(&server.uri());
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, DraftingError::EmptyCompletion { .. }));
        assert!(err.to_string().contains("llama3-70b-8192"));
    }

    #[tokio::test]
    async fn empty_string_content_counts_as_no_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": ""}}]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server.uri());
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, DraftingError::EmptyCompletion { .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = make_client(&server.uri());
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, DraftingError::Decode(_)));
    }
}
