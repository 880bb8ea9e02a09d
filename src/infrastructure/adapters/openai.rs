//! OpenAI 兼容接口的公共客户端配置
//!
//! 文本生成与语音合成客户端共用同一组连接参数

use reqwest::Client;
use std::time::Duration;

/// 重试基础退避时间（毫秒），第 n 次重试等待 base * 2^(n-1)
const RETRY_BACKOFF_MS: u64 = 500;

/// OpenAI 客户端配置
#[derive(Clone)]
pub struct OpenAiClientConfig {
    /// API 基础 URL，例如 `https://api.openai.com/v1`
    pub base_url: String,
    /// Bearer 凭证
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 网络错误/超时/5xx 时的重试次数
    pub max_retries: u32,
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            timeout_secs: 120,
            max_retries: 0,
        }
    }
}

impl std::fmt::Debug for OpenAiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl OpenAiClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// 拼接接口地址
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

pub(crate) fn build_http_client(config: &OpenAiClientConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}

pub(crate) fn retry_backoff(attempt: u32) -> Duration {
    Duration::from_millis(RETRY_BACKOFF_MS << attempt.saturating_sub(1).min(6))
}

/// 截断过长的错误响应体，避免日志被刷屏
pub(crate) fn truncate_body(body: String) -> String {
    const MAX_LEN: usize = 500;
    if body.len() <= MAX_LEN {
        return body;
    }
    let mut end = MAX_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
