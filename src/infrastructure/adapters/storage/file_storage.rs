//! File Storage - 文件系统音频片段存储
//!
//! 实现 ClipStoragePort trait

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ClipStorageError, ClipStoragePort};

/// 片段文件扩展名
pub const CLIP_EXTENSION: &str = "mp3";

/// 文件系统片段存储
///
/// 每轮一个文件：`<output_dir>/<index>.mp3`
pub struct FileClipStorage {
    /// 输出目录
    output_dir: PathBuf,
}

impl FileClipStorage {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// 根目录、空路径、以 `.` 结尾或含 `..` 的路径不允许被整体删除
    ///
    /// `Path::components` 会吞掉中间和末尾的 `.`，所以按原始分段判断
    fn is_safe_to_reset(&self) -> bool {
        let raw = self.output_dir.to_string_lossy();
        let segments: Vec<&str> = raw
            .split(std::path::is_separator)
            .filter(|segment| !segment.is_empty())
            .collect();

        let names_folder = match segments.last() {
            Some(last) => *last != "." && !segments.contains(&".."),
            None => false,
        };

        names_folder
            && matches!(
                self.output_dir.components().next_back(),
                Some(Component::Normal(_))
            )
    }
}

#[async_trait]
impl ClipStoragePort for FileClipStorage {
    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn clip_path(&self, index: u32) -> PathBuf {
        self.output_dir.join(format!("{}.{}", index, CLIP_EXTENSION))
    }

    async fn reset(&self) -> Result<(), ClipStorageError> {
        if !self.is_safe_to_reset() {
            return Err(ClipStorageError::UnsafeOutputDir(self.output_dir.clone()));
        }

        match fs::remove_dir_all(&self.output_dir).await {
            Ok(()) => {
                tracing::debug!(dir = %self.output_dir.display(), "Removed previous output");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(ClipStorageError::IoError(e.to_string())),
        }

        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ClipStorageError::IoError(e.to_string()))?;

        tracing::info!(dir = %self.output_dir.display(), "Output directory reset");

        Ok(())
    }

    async fn save_clip(&self, index: u32, data: &[u8]) -> Result<PathBuf, ClipStorageError> {
        let path = self.clip_path(index);

        fs::write(&path, data)
            .await
            .map_err(|e| ClipStorageError::IoError(e.to_string()))?;

        tracing::debug!("Saved clip: index={}, size={} bytes", index, data.len());

        Ok(path)
    }

    async fn list_clips(&self) -> Result<Vec<PathBuf>, ClipStorageError> {
        let mut entries = fs::read_dir(&self.output_dir)
            .await
            .map_err(|e| ClipStorageError::IoError(e.to_string()))?;

        let suffix = format!(".{}", CLIP_EXTENSION);
        let mut clips = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ClipStorageError::IoError(e.to_string()))?
        {
            let is_clip = entry
                .file_name()
                .to_str()
                .map_or(false, |name| name.ends_with(&suffix));
            let is_file = entry
                .file_type()
                .await
                .map_or(false, |file_type| file_type.is_file());

            if is_clip && is_file {
                clips.push(entry.path());
            }
        }

        Ok(clips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reset_removes_stale_files() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("audio_files");
        std::fs::create_dir_all(output_dir.join("nested")).unwrap();
        std::fs::write(output_dir.join("7.mp3"), b"stale").unwrap();
        std::fs::write(output_dir.join("notes.txt"), b"stale").unwrap();

        let storage = FileClipStorage::new(&output_dir);
        storage.reset().await.unwrap();

        assert!(output_dir.is_dir());
        assert_eq!(std::fs::read_dir(&output_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_reset_creates_missing_dir() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("a").join("b");

        FileClipStorage::new(&output_dir).reset().await.unwrap();

        assert!(output_dir.is_dir());
    }

    #[tokio::test]
    async fn test_reset_refuses_unsafe_paths() {
        assert!(matches!(
            FileClipStorage::new("/").reset().await,
            Err(ClipStorageError::UnsafeOutputDir(_))
        ));
        assert!(matches!(
            FileClipStorage::new("").reset().await,
            Err(ClipStorageError::UnsafeOutputDir(_))
        ));
        assert!(matches!(
            FileClipStorage::new("audio/..").reset().await,
            Err(ClipStorageError::UnsafeOutputDir(_))
        ));
    }

    #[tokio::test]
    async fn test_reset_refuses_trailing_dot_segments() {
        let temp_dir = tempdir().unwrap();
        let program_file = temp_dir.path().join("podcaster");
        std::fs::write(&program_file, b"binary").unwrap();
        std::fs::create_dir(temp_dir.path().join("audio")).unwrap();

        for output_dir in [
            temp_dir.path().join("./"),
            temp_dir.path().join("audio/."),
            temp_dir.path().join("audio/../audio"),
        ] {
            assert!(matches!(
                FileClipStorage::new(&output_dir).reset().await,
                Err(ClipStorageError::UnsafeOutputDir(_))
            ));
        }

        assert!(program_file.exists());
        assert!(temp_dir.path().join("audio").is_dir());
    }

    #[tokio::test]
    async fn test_save_and_list_clips() {
        let temp_dir = tempdir().unwrap();
        let storage = FileClipStorage::new(temp_dir.path().join("audio_files"));
        storage.reset().await.unwrap();

        for i in 1..=3 {
            let path = storage.save_clip(i, b"data").await.unwrap();
            assert_eq!(path, storage.clip_path(i));
            assert!(path.exists());
        }
        std::fs::write(storage.output_dir().join("readme.txt"), b"x").unwrap();

        let mut clips = storage.list_clips().await.unwrap();
        clips.sort();
        let names: Vec<String> = clips
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1.mp3", "2.mp3", "3.mp3"]);
    }
}
