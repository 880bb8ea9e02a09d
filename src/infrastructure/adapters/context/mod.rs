//! Context Adapter - 上下文读取实现

mod folder_context_reader;

pub use folder_context_reader::{FolderContextReader, CONTEXT_FILE_SUFFIX};
