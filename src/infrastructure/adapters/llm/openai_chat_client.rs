//! OpenAI Chat Client - 调用 Chat Completions 接口
//!
//! 实现 ChatCompletionPort trait
//!
//! POST {base_url}/chat/completions
//! Request: {"model": "...", "messages": [...], "response_format": {"type": "json_object"}}
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::ports::{ChatCompletionPort, GenerationError, GenerationRequest};
use crate::infrastructure::adapters::openai::{
    build_http_client, retry_backoff, truncate_body, OpenAiClientConfig,
};

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<MessageBody<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI Chat 客户端
pub struct OpenAiChatClient {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiChatClient {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, GenerationError> {
        let client =
            build_http_client(&config).map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        self.config.endpoint("chat/completions")
    }

    async fn send_once(&self, body: &ChatCompletionBody<'_>) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GenerationError::Unauthorized);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ServiceError {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                GenerationError::InvalidResponse("No message content in response".to_string())
            })
    }
}

fn map_transport_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout
    } else if e.is_connect() {
        GenerationError::NetworkError(format!("Cannot connect to generation service: {}", e))
    } else {
        GenerationError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl ChatCompletionPort for OpenAiChatClient {
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| MessageBody {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            response_format: request.json_response.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %request.model,
            messages = body.messages.len(),
            "Sending chat completion request"
        );

        let mut attempt = 0;
        loop {
            match self.send_once(&body).await {
                Ok(content) => {
                    tracing::info!(
                        model = %request.model,
                        reply_len = content.len(),
                        "Chat completion received"
                    );
                    return Ok(content);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, "Chat completion failed, retrying");
                    tokio::time::sleep(retry_backoff(attempt)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ChatMessage;
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hello")],
            json_response: true,
        }
    }

    fn client(server: &mockito::Server) -> OpenAiChatClient {
        OpenAiChatClient::new(OpenAiClientConfig::new(server.url(), "sk-test")).unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "response_format": {"type": "json_object"},
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "{\"1\":{\"alpha\":\"Hi\"}}"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let content = client(&server).complete(request()).await.unwrap();

        assert_eq!(content, r#"{"1":{"alpha":"Hi"}}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .create_async()
            .await;

        let err = client(&server).complete(request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Unauthorized));
    }

    #[tokio::test]
    async fn test_service_error_carries_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let err = client(&server).complete(request()).await.unwrap_err();
        match err {
            GenerationError::ServiceError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_choices_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let err = client(&server).complete(request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let config = OpenAiClientConfig::new(server.url(), "sk-test").with_max_retries(1);
        let err = OpenAiChatClient::new(config)
            .unwrap()
            .complete(request())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::ServiceError { status: 503, .. }));
        mock.assert_async().await;
    }
}
