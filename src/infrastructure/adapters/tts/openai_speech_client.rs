//! OpenAI Speech Client - 调用外部语音合成 HTTP 服务
//!
//! 实现 TtsEnginePort trait
//!
//! 外部 TTS API:
//! POST {base_url}/audio/speech
//! Request: {"model": "tts-1", "voice": "nova", "input": "...", "response_format": "mp3"}  (JSON)
//! Response: audio/mpeg binary

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::application::ports::{SpeechAudio, SpeechRequest, TtsEnginePort, TtsError};
use crate::infrastructure::adapters::openai::{
    build_http_client, retry_backoff, truncate_body, OpenAiClientConfig,
};

/// 语音合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct SpeechHttpRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'static str,
}

/// OpenAI 语音合成客户端
pub struct OpenAiSpeechClient {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiSpeechClient {
    /// 创建新的语音合成客户端
    pub fn new(config: OpenAiClientConfig) -> Result<Self, TtsError> {
        let client =
            build_http_client(&config).map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取合成 URL
    fn speech_url(&self) -> String {
        self.config.endpoint("audio/speech")
    }

    async fn send_once(&self, body: &SpeechHttpRequest<'_>) -> Result<SpeechAudio, TtsError> {
        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TtsError::Unauthorized);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TtsError::RateLimited);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError {
                status: status.as_u16(),
                body: truncate_body(error_text),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // 直接获取音频字节
        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio_data.is_empty() {
            return Err(TtsError::EmptyAudio);
        }

        Ok(SpeechAudio {
            audio_data,
            content_type,
        })
    }
}

#[async_trait]
impl TtsEnginePort for OpenAiSpeechClient {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, TtsError> {
        let body = SpeechHttpRequest {
            model: &request.model,
            voice: &request.voice,
            input: &request.text,
            response_format: "mp3",
        };

        tracing::debug!(
            url = %self.speech_url(),
            text_len = request.text.len(),
            voice = %request.voice,
            "Sending speech request"
        );

        let mut attempt = 0;
        loop {
            match self.send_once(&body).await {
                Ok(audio) => {
                    tracing::debug!(
                        voice = %request.voice,
                        audio_size = audio.audio_data.len(),
                        content_type = ?audio.content_type,
                        "Speech synthesis completed"
                    );
                    return Ok(audio);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, "Speech request failed, retrying");
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
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> SpeechRequest {
        SpeechRequest {
            model: "tts-1".to_string(),
            voice: "nova".to_string(),
            text: "Hi".to_string(),
        }
    }

    fn client(server: &mockito::Server) -> OpenAiSpeechClient {
        OpenAiSpeechClient::new(OpenAiClientConfig::new(server.url(), "sk-test")).unwrap()
    }

    #[tokio::test]
    async fn test_synthesize_returns_audio_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "model": "tts-1",
                "voice": "nova",
                "input": "Hi",
                "response_format": "mp3"
            })))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(b"ID3fake-mp3")
            .create_async()
            .await;

        let audio = client(&server).synthesize(request()).await.unwrap();

        assert_eq!(audio.audio_data, b"ID3fake-mp3");
        assert_eq!(audio.content_type.as_deref(), Some("audio/mpeg"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_body_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/audio/speech")
            .with_status(200)
            .create_async()
            .await;

        let err = client(&server).synthesize(request()).await.unwrap_err();
        assert!(matches!(err, TtsError::EmptyAudio));
    }

    #[tokio::test]
    async fn test_rate_limited_not_retried_without_budget() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .with_status(429)
            .expect(1)
            .create_async()
            .await;

        let err = client(&server).synthesize(request()).await.unwrap_err();
        assert!(matches!(err, TtsError::RateLimited));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bad_request_is_service_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/audio/speech")
            .with_status(400)
            .with_body("input too long")
            .create_async()
            .await;

        let err = client(&server).synthesize(request()).await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(matches!(err, TtsError::ServiceError { status: 400, .. }));
    }
}
