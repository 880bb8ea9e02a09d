//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod context;
pub mod llm;
pub mod media;
pub mod openai;
pub mod storage;
pub mod tts;

pub use context::*;
pub use llm::*;
pub use media::*;
pub use openai::OpenAiClientConfig;
pub use storage::*;
pub use tts::*;
