//! Storage Adapter - 音频片段存储实现

mod file_storage;

pub use file_storage::{FileClipStorage, CLIP_EXTENSION};
