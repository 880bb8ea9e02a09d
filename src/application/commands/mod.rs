//! 应用层 - 命令
//!
//! 流水线中每一步对应一个命令及其处理器

mod audio_commands;
mod script_commands;

pub mod handlers;

pub use audio_commands::*;
pub use script_commands::*;
