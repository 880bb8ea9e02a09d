//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 始终返回固定的音频数据，不实际调用 TTS 服务

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::application::ports::{SpeechAudio, SpeechRequest, TtsEnginePort, TtsError};

/// Fake TTS Client
///
/// 返回固定音频；文本命中 `fail_on_text` 时返回服务错误
pub struct FakeTtsClient {
    /// 缓存的音频数据
    audio_data: Vec<u8>,
    failing_texts: HashSet<String>,
    requests: Mutex<Vec<SpeechRequest>>,
}

impl FakeTtsClient {
    /// 直接使用内存中的音频数据
    pub fn with_audio(audio_data: Vec<u8>) -> Self {
        Self {
            audio_data,
            failing_texts: HashSet::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 对指定文本返回错误，模拟单轮合成失败
    pub fn fail_on_text(mut self, text: impl Into<String>) -> Self {
        self.failing_texts.insert(text.into());
        self
    }

    /// 已收到的请求（按顺序）
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, TtsError> {
        tracing::debug!(
            text_len = request.text.len(),
            voice = %request.voice,
            "FakeTtsClient: returning fixed audio"
        );

        let should_fail = self.failing_texts.contains(&request.text);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if should_fail {
            return Err(TtsError::ServiceError {
                status: 500,
                body: "simulated failure".to_string(),
            });
        }

        Ok(SpeechAudio {
            audio_data: self.audio_data.clone(),
            content_type: Some("audio/mpeg".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> SpeechRequest {
        SpeechRequest {
            model: "tts-1".to_string(),
            voice: "nova".to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_fixed_audio_and_records_requests() {
        let client = FakeTtsClient::with_audio(b"sample".to_vec()).fail_on_text("boom");

        let audio = client.synthesize(request("Hi")).await.unwrap();
        assert_eq!(audio.audio_data, b"sample");

        let err = client.synthesize(request("boom")).await.unwrap_err();
        assert!(matches!(err, TtsError::ServiceError { status: 500, .. }));

        let texts: Vec<String> = client.requests().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["Hi", "boom"]);
    }
}
