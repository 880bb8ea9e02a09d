//! Script Context - Errors

use thiserror::Error;

/// 生成结果无法解析为合法脚本
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("回复不是合法的 JSON: {0}")]
    InvalidJson(String),

    #[error("回复顶层必须是 JSON 对象")]
    NotAnObject,

    #[error("脚本为空，没有任何对话轮次")]
    Empty,

    #[error("无效的轮次序号: {0:?}")]
    InvalidIndex(String),

    #[error("重复的轮次序号: {0}")]
    DuplicateIndex(u32),

    #[error("轮次序号不连续: 期望 {expected}，实际 {found}")]
    NonContiguous { expected: u32, found: u32 },

    #[error("第 {index} 轮必须是 {{说话人: 内容}} 形式的对象")]
    InvalidTurn { index: u32 },

    #[error("第 {index} 轮必须恰好包含一个说话人，实际 {count} 个")]
    SpeakerCount { index: u32, count: usize },

    #[error("第 {index} 轮的说话人名称为空")]
    InvalidSpeaker { index: u32 },

    #[error("第 {index} 轮的内容必须是非空字符串")]
    EmptyText { index: u32 },
}
