//! Script Context - Entities

use serde::{Deserialize, Serialize};

use super::Speaker;

/// 对话轮次
///
/// 一轮只有一个说话人，`index` 从 1 开始，决定播放顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub index: u32,
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn new(index: u32, speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            index,
            speaker,
            text: text.into(),
        }
    }
}
