//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_concatenator;
mod chat_completion;
mod clip_storage;
mod context_source;
mod tts_engine;

pub use audio_concatenator::{AudioConcatenatorPort, ConcatError};
pub use chat_completion::{
    ChatCompletionPort, ChatMessage, ChatRole, GenerationError, GenerationRequest,
};
pub use clip_storage::{ClipStorageError, ClipStoragePort};
pub use context_source::{ContextError, ContextSourcePort};
pub use tts_engine::{SpeechAudio, SpeechRequest, TtsEnginePort, TtsError};
