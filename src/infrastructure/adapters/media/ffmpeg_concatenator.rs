//! FFmpeg Concatenator - 调用外部 ffmpeg/ffprobe 拼接音频
//!
//! 实现 AudioConcatenatorPort trait
//!
//! ffmpeg -y -i 1.mp3 -i 2.mp3 -filter_complex concat=n=2:v=0:a=1 -c:a libmp3lame out.mp3

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{AudioConcatenatorPort, ConcatError};

/// ffmpeg 配置
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// ffmpeg 可执行文件路径
    pub ffmpeg_path: PathBuf,
    /// ffprobe 可执行文件路径
    pub ffprobe_path: PathBuf,
    /// 输出音频编码器
    pub audio_codec: String,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            audio_codec: "libmp3lame".to_string(),
        }
    }
}

/// FFmpeg 拼接器
pub struct FfmpegConcatenator {
    config: FfmpegConfig,
}

impl FfmpegConcatenator {
    pub fn new(config: FfmpegConfig) -> Self {
        Self { config }
    }

    /// 构建拼接参数：每个输入一个 `-i`，再接 concat 过滤器与输出编码
    pub fn concat_args(&self, inputs: &[PathBuf], output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into()];
        for input in inputs {
            args.push("-i".into());
            args.push(input.as_os_str().to_owned());
        }
        args.push("-filter_complex".into());
        args.push(format!("concat=n={}:v=0:a=1", inputs.len()).into());
        args.push("-c:a".into());
        args.push(self.config.audio_codec.clone().into());
        args.push(output.as_os_str().to_owned());
        args
    }

    fn probe_args(path: &Path) -> Vec<OsString> {
        vec![
            "-v".into(),
            "error".into(),
            "-show_entries".into(),
            "format=duration".into(),
            "-of".into(),
            "default=noprint_wrappers=1:nokey=1".into(),
            path.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl AudioConcatenatorPort for FfmpegConcatenator {
    async fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ConcatError> {
        if inputs.is_empty() {
            return Err(ConcatError::NoInputs);
        }

        let mut cmd = Command::new(&self.config.ffmpeg_path);
        cmd.args(self.concat_args(inputs, output));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        tracing::debug!(command = ?cmd, "Running ffmpeg");

        let result = cmd.output().await.map_err(|e| {
            ConcatError::SpawnError(format!("{}: {}", self.config.ffmpeg_path.display(), e))
        })?;

        if !result.status.success() {
            return Err(ConcatError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        tracing::debug!(inputs = inputs.len(), output = %output.display(), "ffmpeg finished");

        Ok(())
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64, ConcatError> {
        let result = Command::new(&self.config.ffprobe_path)
            .args(Self::probe_args(path))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ConcatError::ProbeError(format!("{}: {}", self.config.ffprobe_path.display(), e))
            })?;

        if !result.status.success() {
            return Err(ConcatError::ProbeError(
                String::from_utf8_lossy(&result.stderr).trim().to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&result.stdout);
        stdout.trim().parse::<f64>().map_err(|e| {
            ConcatError::ProbeError(format!(
                "Unexpected ffprobe output {:?}: {}",
                stdout.trim(),
                e
            ))
        })
    }
}
