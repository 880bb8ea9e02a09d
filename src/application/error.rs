//! 应用层错误定义
//!
//! 只有会中止整次运行的错误才出现在这里；
//! 单轮合成失败与拼接失败记录在运行报告中

use std::path::PathBuf;
use thiserror::Error;

use crate::application::ports::{ClipStorageError, ContextError, GenerationError};
use crate::domain::ScriptError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 上下文目录不存在
    #[error("Context folder not found: {}", .0.display())]
    InputMissing(PathBuf),

    /// 上下文读取失败
    #[error("Failed to read context: {0}")]
    ContextRead(String),

    /// 文本生成服务调用失败
    #[error("Script generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// 生成结果无法解析为脚本
    #[error("Malformed generation output: {0}")]
    MalformedScript(#[from] ScriptError),

    /// 输出目录重置失败
    #[error("Failed to reset output directory: {0}")]
    OutputReset(#[from] ClipStorageError),
}

impl ApplicationError {
    /// 是否为输入缺失
    pub fn is_input_missing(&self) -> bool {
        matches!(self, Self::InputMissing(_))
    }

    /// 是否为生成结果格式错误
    pub fn is_malformed_output(&self) -> bool {
        matches!(self, Self::MalformedScript(_))
    }
}

impl From<ContextError> for ApplicationError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::NotFound(path) => Self::InputMissing(path),
            other => Self::ContextRead(other.to_string()),
        }
    }
}
