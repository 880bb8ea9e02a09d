//! Audio Commands - 语音合成与拼接命令

use std::path::PathBuf;

use crate::application::ports::ConcatError;
use crate::domain::Script;

/// 将脚本逐轮合成为音频片段
#[derive(Debug, Clone)]
pub struct SynthesizeScript {
    pub script: Script,
}

/// 成功生成的片段
#[derive(Debug, Clone)]
pub struct ClipInfo {
    pub index: u32,
    pub speaker: String,
    pub voice: String,
    pub path: PathBuf,
    pub size_bytes: usize,
}

/// 合成失败的轮次
#[derive(Debug, Clone)]
pub struct TurnFailure {
    pub index: u32,
    pub speaker: String,
    pub error: String,
}

/// 合成响应
#[derive(Debug, Clone, Default)]
pub struct SynthesizeScriptResponse {
    pub clips: Vec<ClipInfo>,
    pub failures: Vec<TurnFailure>,
}

/// 将输出目录中的片段拼接为一个文件
#[derive(Debug, Clone)]
pub struct ConcatenateAudio {
    pub output_path: PathBuf,
}

/// 拼接结果
#[derive(Debug, Clone)]
pub enum ConcatOutcome {
    Combined {
        output_path: PathBuf,
        /// 时长（秒），探测失败时为 None
        duration_secs: Option<f64>,
    },
    Failed(ConcatError),
}

impl ConcatOutcome {
    pub fn is_combined(&self) -> bool {
        matches!(self, ConcatOutcome::Combined { .. })
    }
}

/// 拼接响应
#[derive(Debug, Clone)]
pub struct ConcatenateAudioResponse {
    /// 按自然序排列的输入文件
    pub inputs: Vec<PathBuf>,
    pub outcome: ConcatOutcome,
}
