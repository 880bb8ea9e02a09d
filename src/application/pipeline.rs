//! Podcast Pipeline - 流水线编排
//!
//! 依次执行：读取上下文 → 生成脚本 → 逐轮合成 → 拼接音频。
//! 每一步完成后才开始下一步，合成阶段逐轮串行请求。

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::commands::handlers::{
    ConcatenateAudioHandler, GenerateScriptHandler, SynthesizeScriptHandler,
};
use crate::application::commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioConcatenatorPort, ChatCompletionPort, ClipStoragePort, ContextSourcePort, TtsEnginePort,
};
use crate::domain::VoiceMapping;

/// 流水线配置
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// 脚本生成模型
    pub script_model: String,
    /// 语音合成模型
    pub speech_model: String,
    /// 说话人音色映射
    pub voices: VoiceMapping,
    /// 合并后的音频路径
    pub combined_path: PathBuf,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            script_model: "gpt-4o".to_string(),
            speech_model: "tts-1".to_string(),
            voices: VoiceMapping::default(),
            combined_path: PathBuf::from("combined_podcast.mp3"),
        }
    }
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// 脚本中的轮次数
    pub turn_count: usize,
    pub clips: Vec<ClipInfo>,
    pub failures: Vec<TurnFailure>,
    pub concat: ConcatenateAudioResponse,
}

impl PipelineReport {
    /// 所有轮次都已合成且拼接成功
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.concat.outcome.is_combined()
    }
}

/// 播客生成流水线
///
/// 所有外部依赖都以端口形式注入
pub struct PodcastPipeline {
    context_source: Arc<dyn ContextSourcePort>,
    generate_handler: GenerateScriptHandler,
    synthesize_handler: SynthesizeScriptHandler,
    concatenate_handler: ConcatenateAudioHandler,
    combined_path: PathBuf,
}

impl PodcastPipeline {
    pub fn new(
        context_source: Arc<dyn ContextSourcePort>,
        chat: Arc<dyn ChatCompletionPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        clip_storage: Arc<dyn ClipStoragePort>,
        concatenator: Arc<dyn AudioConcatenatorPort>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            context_source,
            generate_handler: GenerateScriptHandler::new(chat, settings.script_model),
            synthesize_handler: SynthesizeScriptHandler::new(
                tts_engine,
                clip_storage.clone(),
                settings.voices,
                settings.speech_model,
            ),
            concatenate_handler: ConcatenateAudioHandler::new(clip_storage, concatenator),
            combined_path: settings.combined_path,
        }
    }

    /// 执行完整流水线
    ///
    /// 上下文缺失/读取失败、生成失败、回复格式错误、输出目录重置失败会中止运行；
    /// 单轮合成失败与拼接失败记录在报告中
    pub async fn run(&self) -> Result<PipelineReport, ApplicationError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline", run_id = %run_id);
        self.run_steps(run_id).instrument(span).await
    }

    async fn run_steps(&self, run_id: Uuid) -> Result<PipelineReport, ApplicationError> {
        let started_at = Utc::now();

        // Step 1: 读取上下文
        let context = self.context_source.load_context().await?;
        tracing::info!(context_len = context.len(), "Context read successfully");

        // Step 2: 生成脚本
        let script = self
            .generate_handler
            .handle(GenerateScript { context })
            .await?;
        let turn_count = script.len();

        // Step 3: 逐轮合成
        let synthesized = self
            .synthesize_handler
            .handle(SynthesizeScript { script })
            .await?;

        if !synthesized.failures.is_empty() {
            tracing::warn!(
                failed = synthesized.failures.len(),
                total = turn_count,
                "Some turns failed to synthesize; combined audio will skip them"
            );
        }

        // Step 4: 拼接
        let concat = self
            .concatenate_handler
            .handle(ConcatenateAudio {
                output_path: self.combined_path.clone(),
            })
            .await;

        let report = PipelineReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            turn_count,
            clips: synthesized.clips,
            failures: synthesized.failures,
            concat,
        };

        tracing::info!(
            clips = report.clips.len(),
            failures = report.failures.len(),
            combined = report.concat.outcome.is_combined(),
            elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
            "Podcast audio generation complete"
        );

        Ok(report)
    }
}
