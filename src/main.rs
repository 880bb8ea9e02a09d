//! Podcaster - 多人对话播客生成
//!
//! 读取上下文目录 → 生成对话脚本 → 逐轮语音合成 → ffmpeg 拼接

use std::sync::Arc;

use anyhow::Context;
use podcaster::application::{ConcatOutcome, PipelineReport, PipelineSettings, PodcastPipeline};
use podcaster::config::{load_config, print_config, LogConfig, OPENAI_API_KEY_ENV};
use podcaster::infrastructure::adapters::{
    FfmpegConcatenator, FfmpegConfig, FileClipStorage, FolderContextReader, OpenAiChatClient,
    OpenAiClientConfig, OpenAiSpeechClient,
};

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},podcaster={}", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn print_report(report: &PipelineReport) {
    tracing::info!(
        "Turns: {}, clips created: {}, failed: {}",
        report.turn_count,
        report.clips.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        tracing::warn!(
            "Turn {} ({}) was skipped: {}",
            failure.index,
            failure.speaker,
            failure.error
        );
    }
    match &report.concat.outcome {
        ConcatOutcome::Combined {
            output_path,
            duration_secs,
        } => match duration_secs {
            Some(secs) => tracing::info!(
                "Combined audio saved to: {} ({:.1}s)",
                output_path.display(),
                secs
            ),
            None => tracing::info!("Combined audio saved to: {}", output_path.display()),
        },
        ConcatOutcome::Failed(e) => {
            tracing::error!("Combined audio was not produced: {}", e)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 可选
    let _ = dotenvy::dotenv();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Podcaster - 多人对话播客生成");
    print_config(&config);

    let api_key = config
        .openai
        .resolve_api_key()
        .with_context(|| format!("Missing API key: set {}", OPENAI_API_KEY_ENV))?;

    let client_config = OpenAiClientConfig::new(config.openai.base_url.clone(), api_key)
        .with_timeout(config.openai.timeout_secs)
        .with_max_retries(config.openai.max_retries);

    let chat = Arc::new(OpenAiChatClient::new(client_config.clone())?);
    let tts_engine = Arc::new(OpenAiSpeechClient::new(client_config)?);

    let context_source = Arc::new(FolderContextReader::new(config.paths.context_dir_path()));
    let clip_storage = Arc::new(FileClipStorage::new(config.paths.output_dir_path()));
    let concatenator = Arc::new(FfmpegConcatenator::new(FfmpegConfig {
        ffmpeg_path: config.media.ffmpeg_path.clone(),
        ffprobe_path: config.media.ffprobe_path.clone(),
        audio_codec: config.media.audio_codec.clone(),
    }));

    let settings = PipelineSettings {
        script_model: config.script.model.clone(),
        speech_model: config.speech.model.clone(),
        voices: config.speech.voice_mapping(),
        combined_path: config.paths.combined_file_path(),
    };

    let pipeline = PodcastPipeline::new(
        context_source,
        chat,
        tts_engine,
        clip_storage,
        concatenator,
        settings,
    );

    match pipeline.run().await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Error: {}", e);
            Err(e.into())
        }
    }
}
