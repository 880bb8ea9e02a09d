//! Context Source Port - 上下文来源抽象
//!
//! 将若干文本文件聚合为一段上下文字符串

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 上下文读取错误
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Context folder not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Context file is not valid UTF-8 text: {}", .0.display())]
    DecodeError(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Context Source Port
#[async_trait]
pub trait ContextSourcePort: Send + Sync {
    /// 读取并拼接全部上下文
    ///
    /// 每个文件输出为 `### <文件名>\n<内容>\n\n`
    async fn load_context(&self) -> Result<String, ContextError>;
}
