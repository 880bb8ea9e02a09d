//! Folder Context Reader - 从目录读取文本文件作为上下文
//!
//! 实现 ContextSourcePort trait。只读取目录下一层的 `.txt` 文件，
//! 按文件名排序以保证输出稳定

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ContextError, ContextSourcePort};

/// 上下文文件后缀
pub const CONTEXT_FILE_SUFFIX: &str = ".txt";

/// 目录上下文读取器
pub struct FolderContextReader {
    dir: PathBuf,
}

impl FolderContextReader {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// 列出目录中的上下文文件名（已排序）
    async fn context_file_names(&self) -> Result<Vec<String>, ContextError> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| ContextError::IoError(e.to_string()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ContextError::IoError(e.to_string()))?
        {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            if !name.ends_with(CONTEXT_FILE_SUFFIX) {
                continue;
            }
            // 跟随符号链接判断
            let is_file = fs::metadata(entry.path())
                .await
                .map_or(false, |m| m.is_file());
            if is_file {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl ContextSourcePort for FolderContextReader {
    async fn load_context(&self) -> Result<String, ContextError> {
        match fs::metadata(&self.dir).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(ContextError::NotFound(self.dir.clone())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ContextError::NotFound(self.dir.clone()))
            }
            Err(e) => return Err(ContextError::IoError(e.to_string())),
        }

        let names = self.context_file_names().await?;
        if names.is_empty() {
            tracing::warn!(dir = %self.dir.display(), "No context files found");
        }

        let mut context = String::new();
        for name in &names {
            let path = self.dir.join(name);
            let bytes = fs::read(&path)
                .await
                .map_err(|e| ContextError::IoError(format!("{}: {}", path.display(), e)))?;
            let content = String::from_utf8(bytes).map_err(|_| ContextError::DecodeError(path))?;

            context.push_str(&format!("### {}\n{}\n\n", name, content));
        }

        tracing::debug!(
            dir = %self.dir.display(),
            files = names.len(),
            context_len = context.len(),
            "Context loaded"
        );

        Ok(context)
    }
}
