//! Podcaster - 文本资料生成多人对话播客
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Script Context: 对话脚本、说话人、校验规则
//! - 音色映射、提示词、自然序排序
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ContextSource, ChatCompletion, TtsEngine, ClipStorage, AudioConcatenator）
//! - Commands: 各步骤命令处理器
//! - Pipeline: 流水线编排
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: 目录读取、OpenAI 客户端、片段存储、ffmpeg

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
