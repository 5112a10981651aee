use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

pub struct ChatCompletionResult {
    pub body: String,
    pub status: StatusCode,
}

pub async fn create_chat_completion(
    client: &Client,
    api_base: &str,
    api_key: &str,
    request: &ChatCompletionRequest,
) -> Result<ChatCompletionResult, CreateChatCompletionError> {
    let url = format!("{}/chat/completions", api_base.trim_end_matches('/'));

    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await
        .map_err(|source| CreateChatCompletionError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| CreateChatCompletionError::ResponseRead { source })?;

    Ok(ChatCompletionResult { body, status })
}

#[derive(Debug, Error)]
pub enum CreateChatCompletionError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// Error envelope shared by OpenAI and compatible servers.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Error)]
pub enum ParseChatCompletionError {
    #[error("ProviderStatus: HTTP {status}: {message}")]
    ProviderStatus {
        status: StatusCode,
        message: String,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },

    #[error("Empty or missing content in response")]
    EmptyContent,
}

/// Extracts the trimmed content of the first choice.
pub fn parse_completion_content(
    result: ChatCompletionResult,
) -> Result<String, ParseChatCompletionError> {
    if !result.status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(&result.body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(result.body);
        return Err(ParseChatCompletionError::ProviderStatus { status: result.status, message });
    }

    let parsed: ChatCompletionResponse = serde_json::from_str(&result.body)?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(ParseChatCompletionError::EmptyContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: StatusCode, body: &str) -> ChatCompletionResult {
        ChatCompletionResult { body: body.to_string(), status }
    }

    #[test]
    fn first_choice_content_is_trimmed() {
        let body = r#"{"id":"x","choices":[
            {"index":0,"message":{"role":"assistant","content":"  SELECT 1\n"}},
            {"index":1,"message":{"role":"assistant","content":"SELECT 2"}}
        ]}"#;

        assert_eq!(parse_completion_content(result(StatusCode::OK, body)).unwrap(), "SELECT 1");
    }

    #[test]
    fn missing_content_is_an_error() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;

        assert!(matches!(
            parse_completion_content(result(StatusCode::OK, body)),
            Err(ParseChatCompletionError::EmptyContent)
        ));
    }

    #[test]
    fn provider_error_message_is_surfaced() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;

        let err = parse_completion_content(result(StatusCode::UNAUTHORIZED, body)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ProviderStatus: HTTP 401 Unauthorized: Incorrect API key provided"
        );
    }

    #[test]
    fn request_omits_unset_temperature() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hi")],
            temperature: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
