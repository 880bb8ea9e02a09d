//! Fake Chat Client - 用于测试的文本生成客户端
//!
//! 返回预设的回复，并记录收到的请求

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::ports::{ChatCompletionPort, GenerationError, GenerationRequest};

/// Fake Chat Client
pub struct FakeChatClient {
    reply: Result<String, GenerationError>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeChatClient {
    /// 始终返回给定文本
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 始终返回给定错误
    pub fn failing(error: GenerationError) -> Self {
        Self {
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests
            .lock()
            .ok()
            .and_then(|requests| requests.last().cloned())
    }
}

#[async_trait]
impl ChatCompletionPort for FakeChatClient {
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        tracing::debug!(model = %request.model, "FakeChatClient: returning canned reply");

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        self.reply.clone()
    }
}
