//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "PODCASTER";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `PODCASTER_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `PODCASTER_SCRIPT__MODEL=gpt-4o-mini`
/// - `PODCASTER_SPEECH__VOICES__GAMMA=echo`
/// - `PODCASTER_MEDIA__FFMPEG_PATH=/opt/homebrew/bin/ffmpeg`
/// - `PODCASTER_PATHS__CONTEXT_DIR=notes`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("openai.base_url", "https://api.openai.com/v1")?
        .set_default("openai.timeout_secs", 120)?
        .set_default("openai.max_retries", 0)?
        .set_default("script.model", "gpt-4o")?
        .set_default("speech.model", "tts-1")?
        .set_default("speech.default_voice", "alloy")?
        .set_default("speech.voices.alpha", "nova")?
        .set_default("speech.voices.beta", "onyx")?
        .set_default("paths.context_dir", "context")?
        .set_default("paths.output_dir", "audio_files")?
        .set_default("paths.combined_file", "combined_podcast.mp3")?
        .set_default("media.ffmpeg_path", "ffmpeg")?
        .set_default("media.ffprobe_path", "ffprobe")?
        .set_default("media.audio_codec", "libmp3lame")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: PODCASTER_OPENAI__BASE_URL=http://localhost:8080/v1
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.openai.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "OpenAI base URL cannot be empty".to_string(),
        ));
    }

    if config.openai.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Request timeout cannot be 0".to_string(),
        ));
    }

    if config.script.model.trim().is_empty() || config.speech.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Model identifiers cannot be empty".to_string(),
        ));
    }

    if config.speech.default_voice.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Default voice cannot be empty".to_string(),
        ));
    }

    if config.media.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "ffmpeg path cannot be empty".to_string(),
        ));
    }

    // 输出目录每次运行都会被整体删除
    if !names_dedicated_dir(&config.paths.output_dir) {
        return Err(ConfigError::ValidationError(
            "Output directory must be a dedicated folder".to_string(),
        ));
    }

    let output_dir = config.paths.output_dir_path();
    if config.paths.program_dir().starts_with(&output_dir) {
        return Err(ConfigError::ValidationError(format!(
            "Output directory {} contains the program directory",
            output_dir.display()
        )));
    }

    if config.paths.context_dir_path().starts_with(&output_dir) {
        return Err(ConfigError::ValidationError(format!(
            "Output directory {} contains the context directory",
            output_dir.display()
        )));
    }

    Ok(())
}

/// 路径最后一段必须是普通目录名，且不含 `..`
fn names_dedicated_dir(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    let segments: Vec<&str> = raw
        .split(std::path::is_separator)
        .filter(|segment| !segment.is_empty())
        .collect();

    match segments.last() {
        Some(last) => *last != "." && !segments.contains(&".."),
        None => false,
    }
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("API Base URL: {}", config.openai.base_url);
    tracing::info!("API Timeout: {}s", config.openai.timeout_secs);
    tracing::info!("API Max Retries: {}", config.openai.max_retries);
    tracing::info!("Script Model: {}", config.script.model);
    tracing::info!("Speech Model: {}", config.speech.model);
    tracing::info!("Default Voice: {}", config.speech.default_voice);
    tracing::info!("Context Directory: {:?}", config.paths.context_dir);
    tracing::info!("Output Directory: {:?}", config.paths.output_dir_path());
    tracing::info!("Combined File: {:?}", config.paths.combined_file_path());
    tracing::info!("ffmpeg: {:?}", config.media.ffmpeg_path);
    tracing::info!("ffprobe: {:?}", config.media.ffprobe_path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_base_url() {
        let mut config = AppConfig::default();
        config.openai.base_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.openai.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_model() {
        let mut config = AppConfig::default();
        config.speech.model = " ".to_string();
        assert!(validate_config(&config).is_err());
    }

    fn config_in(base_dir: &Path, output_dir: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.base_dir = Some(base_dir.to_path_buf());
        config.paths.context_dir = base_dir.join("context");
        config.paths.output_dir = PathBuf::from(output_dir);
        config
    }

    #[test]
    fn test_validation_error_for_unsafe_output_dir() {
        let temp_dir = tempdir().unwrap();

        for output_dir in [".", "./", "", "/", "audio/.", "audio/..", "../", "a/../b"] {
            let config = config_in(temp_dir.path(), output_dir);
            assert!(
                validate_config(&config).is_err(),
                "output_dir {:?} should be rejected",
                output_dir
            );
        }
    }

    #[test]
    fn test_validation_passes_for_nested_output_dir() {
        let temp_dir = tempdir().unwrap();

        for output_dir in ["audio_files", "./audio_files", "out/clips/"] {
            let config = config_in(temp_dir.path(), output_dir);
            assert!(
                validate_config(&config).is_ok(),
                "output_dir {:?} should be accepted",
                output_dir
            );
        }
    }

    #[test]
    fn test_validation_error_for_output_over_context_dir() {
        let temp_dir = tempdir().unwrap();

        // 两者按不同基准解析后指向同一目录
        let config = config_in(temp_dir.path(), "context");
        assert!(validate_config(&config).is_err());

        let mut config = config_in(temp_dir.path(), "notes");
        config.paths.context_dir = temp_dir.path().join("notes").join("week1");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_absolute_program_dir() {
        let temp_dir = tempdir().unwrap();
        let program_dir = temp_dir.path().join("app");
        let mut config = config_in(&program_dir, "audio_files");
        config.paths.output_dir = temp_dir.path().to_path_buf();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file_merges_voices() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("podcaster.toml");
        std::fs::write(
            &path,
            r#"
[script]
model = "gpt-4o-mini"

[speech.voices]
gamma = "echo"

[media]
ffmpeg_path = "/opt/homebrew/bin/ffmpeg"
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();

        assert_eq!(config.script.model, "gpt-4o-mini");
        assert_eq!(config.speech.model, "tts-1");
        assert_eq!(config.speech.voices.get("alpha").map(String::as_str), Some("nova"));
        assert_eq!(config.speech.voices.get("gamma").map(String::as_str), Some("echo"));
        assert_eq!(
            config.media.ffmpeg_path,
            PathBuf::from("/opt/homebrew/bin/ffmpeg")
        );
    }
}
