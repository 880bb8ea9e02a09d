//! Chat Completion Port - 文本生成服务抽象
//!
//! 只负责一次请求/回复，回复文本的解析由应用层完成

use async_trait::async_trait;
use thiserror::Error;

/// 文本生成错误
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
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
}

impl GenerationError {
    /// 是否值得重试
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::NetworkError(_)
            | GenerationError::Timeout
            | GenerationError::RateLimited => true,
            GenerationError::ServiceError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
        }
    }
}

/// 单条消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// 生成请求
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// 模型标识
    pub model: String,
    /// 按顺序排列的消息
    pub messages: Vec<ChatMessage>,
    /// 是否要求结构化（JSON 对象）回复
    pub json_response: bool,
}

/// Chat Completion Port
#[async_trait]
pub trait ChatCompletionPort: Send + Sync {
    /// 发送消息并返回回复的原始文本
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
