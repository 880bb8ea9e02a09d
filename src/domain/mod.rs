//! Domain Layer - 领域层
//!
//! - Script Context: 对话脚本及其校验
//! - voice: 说话人音色映射
//! - prompt: 脚本生成提示词
//! - natural_sort: 音频文件自然序排序

pub mod script;
pub mod voice;

mod natural_sort;
mod prompt;

pub use natural_sort::{natural_sort_key, sort_natural, SortSegment};
pub use prompt::{system_instruction, user_instruction, Persona, DEFAULT_PERSONAS};
pub use script::{Script, ScriptError, Speaker, Turn};
pub use voice::{VoiceMapping, DEFAULT_VOICE};
