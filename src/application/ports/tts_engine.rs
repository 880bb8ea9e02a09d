//! TTS Engine Port - 语音合成服务抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Clone, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("Service error: HTTP {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Service returned empty audio")]
    EmptyAudio,
}

impl TtsError {
    /// 是否值得重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TtsError::NetworkError(_) | TtsError::Timeout | TtsError::RateLimited => true,
            TtsError::ServiceError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// 语音合成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    /// 模型标识
    pub model: String,
    /// 音色标识
    pub voice: String,
    /// 要合成的文本
    pub text: String,
}

/// 语音合成结果
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    /// 音频数据（原样写入文件）
    pub audio_data: Vec<u8>,
    /// 服务端声明的 Content-Type
    pub content_type: Option<String>,
}

/// TTS Engine Port
///
/// 外部语音合成服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成一段语音
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, TtsError>;
}
