//! Audio Concatenator Port - 音频拼接抽象
//!
//! 由外部媒体工具把多个片段按给定顺序合并为一个文件

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 拼接错误
#[derive(Debug, Clone, Error)]
pub enum ConcatError {
    #[error("No audio clips to concatenate")]
    NoInputs,

    #[error("Failed to list audio clips: {0}")]
    ListError(String),

    #[error("Failed to start media tool: {0}")]
    SpawnError(String),

    #[error("Media tool failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Failed to probe audio: {0}")]
    ProbeError(String),
}

/// Audio Concatenator Port
#[async_trait]
pub trait AudioConcatenatorPort: Send + Sync {
    /// 按 `inputs` 的顺序拼接到 `output`，已存在则覆盖
    async fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ConcatError>;

    /// 获取音频时长（秒）
    async fn probe_duration(&self, path: &Path) -> Result<f64, ConcatError>;
}
