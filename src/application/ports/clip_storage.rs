//! Clip Storage Port - 出站端口
//!
//! 管理每轮音频片段所在的输出目录

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 片段存储错误
#[derive(Debug, Error)]
pub enum ClipStorageError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Refusing to reset unsafe output directory: {}", .0.display())]
    UnsafeOutputDir(PathBuf),
}

/// Clip Storage Port - 出站端口
#[async_trait]
pub trait ClipStoragePort: Send + Sync {
    /// 输出目录
    fn output_dir(&self) -> &Path;

    /// 某一轮的音频文件路径
    fn clip_path(&self, index: u32) -> PathBuf;

    /// 删除并重建输出目录，上一次运行的文件不会残留
    async fn reset(&self) -> Result<(), ClipStorageError>;

    /// 保存某一轮的音频
    async fn save_clip(&self, index: u32, data: &[u8]) -> Result<PathBuf, ClipStorageError>;

    /// 列出目录中的音频文件（未排序）
    async fn list_clips(&self) -> Result<Vec<PathBuf>, ClipStorageError>;
}
