//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::domain::{VoiceMapping, DEFAULT_VOICE};

/// 凭证环境变量名
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// OpenAI 兼容服务配置
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// 脚本生成配置
    #[serde(default)]
    pub script: ScriptConfig,

    /// 语音合成配置
    #[serde(default)]
    pub speech: SpeechConfig,

    /// 路径配置
    #[serde(default)]
    pub paths: PathsConfig,

    /// 外部媒体工具配置
    #[serde(default)]
    pub media: MediaConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// OpenAI 兼容服务配置
#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
    /// 服务基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 凭证；未设置时读取 `OPENAI_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 最大重试次数
    #[serde(default)]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
            max_retries: 0,
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl OpenAiConfig {
    /// 获取凭证：配置优先，其次环境变量
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(OPENAI_API_KEY_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}

/// 脚本生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptConfig {
    /// 模型标识
    #[serde(default = "default_script_model")]
    pub model: String,
}

fn default_script_model() -> String {
    "gpt-4o".to_string()
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            model: default_script_model(),
        }
    }
}

/// 语音合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// 模型标识
    #[serde(default = "default_speech_model")]
    pub model: String,

    /// 说话人 → 音色
    #[serde(default = "default_voices")]
    pub voices: HashMap<String, String>,

    /// 未识别说话人的音色
    #[serde(default = "default_voice")]
    pub default_voice: String,
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_voices() -> HashMap<String, String> {
    HashMap::from([
        ("alpha".to_string(), "nova".to_string()),
        ("beta".to_string(), "onyx".to_string()),
    ])
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: default_speech_model(),
            voices: default_voices(),
            default_voice: default_voice(),
        }
    }
}

impl SpeechConfig {
    /// 构建音色映射
    pub fn voice_mapping(&self) -> VoiceMapping {
        let mut mapping = VoiceMapping::new(self.default_voice.clone());
        for (speaker, voice) in &self.voices {
            mapping.insert(speaker, voice.clone());
        }
        mapping
    }
}

/// 路径配置
///
/// `output_dir` 与 `combined_file` 为相对路径时相对于程序所在目录；
/// `context_dir` 为相对路径时相对于当前工作目录
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// 覆盖程序所在目录
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// 上下文文本目录
    #[serde(default = "default_context_dir")]
    pub context_dir: PathBuf,

    /// 每轮音频输出目录（每次运行前清空）
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 合并后的音频文件
    #[serde(default = "default_combined_file")]
    pub combined_file: PathBuf,
}

fn default_context_dir() -> PathBuf {
    PathBuf::from("context")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("audio_files")
}

fn default_combined_file() -> PathBuf {
    PathBuf::from("combined_podcast.mp3")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            context_dir: default_context_dir(),
            output_dir: default_output_dir(),
            combined_file: default_combined_file(),
        }
    }
}

impl PathsConfig {
    /// 程序所在目录
    pub fn program_dir(&self) -> PathBuf {
        let dir = match &self.base_dir {
            Some(base_dir) => base_dir.clone(),
            None => std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        normalize_path(&working_dir(), &dir)
    }

    /// 上下文目录的完整路径（相对于当前工作目录）
    pub fn context_dir_path(&self) -> PathBuf {
        normalize_path(&working_dir(), &self.context_dir)
    }

    /// 输出目录的完整路径
    pub fn output_dir_path(&self) -> PathBuf {
        normalize_path(&self.program_dir(), &self.output_dir)
    }

    /// 合并文件的完整路径
    pub fn combined_file_path(&self) -> PathBuf {
        normalize_path(&self.program_dir(), &self.combined_file)
    }
}

fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// 按词法规范化路径：相对路径拼接到 `base`，去掉 `.`，折叠 `..`
///
/// 不访问文件系统，不解析符号链接
pub fn normalize_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// 外部媒体工具配置
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// ffmpeg 路径
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// ffprobe 路径
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// 输出编码器
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_audio_codec() -> String {
    "libmp3lame".to_string()
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            audio_codec: default_audio_codec(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
