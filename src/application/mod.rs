//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（ContextSource、ChatCompletion、TtsEngine、ClipStorage、AudioConcatenator）
//! - commands: 流水线各步骤的命令及处理器
//! - pipeline: 流水线编排
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod pipeline;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{ConcatenateAudioHandler, GenerateScriptHandler, SynthesizeScriptHandler},
    ClipInfo, ConcatOutcome, ConcatenateAudio, ConcatenateAudioResponse, GenerateScript,
    SynthesizeScript, SynthesizeScriptResponse, TurnFailure,
};

pub use error::ApplicationError;

pub use pipeline::{PipelineReport, PipelineSettings, PodcastPipeline};

pub use ports::{
    // Audio concatenator
    AudioConcatenatorPort,
    ConcatError,
    // Chat completion
    ChatCompletionPort,
    ChatMessage,
    ChatRole,
    GenerationError,
    GenerationRequest,
    // Clip storage
    ClipStorageError,
    ClipStoragePort,
    // Context source
    ContextError,
    ContextSourcePort,
    // TTS engine
    SpeechAudio,
    SpeechRequest,
    TtsEnginePort,
    TtsError,
};
