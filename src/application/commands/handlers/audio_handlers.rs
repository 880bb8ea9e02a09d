//! Audio Command Handlers - 语音合成与拼接

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::application::commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioConcatenatorPort, ClipStorageError, ClipStoragePort, ConcatError, SpeechRequest,
    TtsEnginePort, TtsError,
};
use crate::domain::{natural_sort_key, Turn, VoiceMapping};

#[derive(Debug, Error)]
enum TurnError {
    #[error(transparent)]
    Tts(#[from] TtsError),

    #[error(transparent)]
    Storage(#[from] ClipStorageError),
}

/// SynthesizeScript Handler - 逐轮合成语音
///
/// 先重置输出目录，再按轮次顺序逐个合成；单轮失败只记录，不中止其余轮次
pub struct SynthesizeScriptHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
    clip_storage: Arc<dyn ClipStoragePort>,
    voices: VoiceMapping,
    model: String,
}

impl SynthesizeScriptHandler {
    pub fn new(
        tts_engine: Arc<dyn TtsEnginePort>,
        clip_storage: Arc<dyn ClipStoragePort>,
        voices: VoiceMapping,
        model: impl Into<String>,
    ) -> Self {
        Self {
            tts_engine,
            clip_storage,
            voices,
            model: model.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: SynthesizeScript,
    ) -> Result<SynthesizeScriptResponse, ApplicationError> {
        self.clip_storage.reset().await?;

        tracing::info!(
            output_dir = %self.clip_storage.output_dir().display(),
            turns = cmd.script.len(),
            "Synthesizing script"
        );

        let mut response = SynthesizeScriptResponse::default();

        for turn in &cmd.script {
            let voice = self.voices.voice_for(&turn.speaker).to_string();

            match self.synthesize_turn(turn, &voice).await {
                Ok(clip) => {
                    tracing::info!(
                        index = clip.index,
                        speaker = %clip.speaker,
                        voice = %clip.voice,
                        path = %clip.path.display(),
                        "Created audio file"
                    );
                    response.clips.push(clip);
                }
                Err(e) => {
                    tracing::error!(
                        index = turn.index,
                        speaker = %turn.speaker,
                        error = %e,
                        "Error creating audio"
                    );
                    response.failures.push(TurnFailure {
                        index: turn.index,
                        speaker: turn.speaker.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(response)
    }

    async fn synthesize_turn(&self, turn: &Turn, voice: &str) -> Result<ClipInfo, TurnError> {
        let request = SpeechRequest {
            model: self.model.clone(),
            voice: voice.to_string(),
            text: turn.text.clone(),
        };

        let audio = self.tts_engine.synthesize(request).await?;
        let path = self
            .clip_storage
            .save_clip(turn.index, &audio.audio_data)
            .await?;

        Ok(ClipInfo {
            index: turn.index,
            speaker: turn.speaker.to_string(),
            voice: voice.to_string(),
            path,
            size_bytes: audio.audio_data.len(),
        })
    }
}

/// ConcatenateAudio Handler - 拼接片段
///
/// 拼接失败不会向上传播，已生成的片段保持不变
pub struct ConcatenateAudioHandler {
    clip_storage: Arc<dyn ClipStoragePort>,
    concatenator: Arc<dyn AudioConcatenatorPort>,
}

impl ConcatenateAudioHandler {
    pub fn new(
        clip_storage: Arc<dyn ClipStoragePort>,
        concatenator: Arc<dyn AudioConcatenatorPort>,
    ) -> Self {
        Self {
            clip_storage,
            concatenator,
        }
    }

    /// 列出片段并按文件名自然序排序
    pub async fn sorted_clips(&self) -> Result<Vec<PathBuf>, ClipStorageError> {
        let clips = self.clip_storage.list_clips().await?;

        let mut named: Vec<(String, PathBuf)> = clips
            .into_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (name, path)
            })
            .collect();
        named.sort_by_cached_key(|(name, _)| natural_sort_key(name));

        Ok(named.into_iter().map(|(_, path)| path).collect())
    }

    pub async fn handle(&self, cmd: ConcatenateAudio) -> ConcatenateAudioResponse {
        let inputs = match self.sorted_clips().await {
            Ok(inputs) => inputs,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list audio clips");
                return ConcatenateAudioResponse {
                    inputs: Vec::new(),
                    outcome: ConcatOutcome::Failed(ConcatError::ListError(e.to_string())),
                };
            }
        };

        tracing::info!(
            clips = inputs.len(),
            output = %cmd.output_path.display(),
            "Concatenating audio clips"
        );

        let outcome = match self
            .concatenator
            .concatenate(&inputs, &cmd.output_path)
            .await
        {
            Ok(()) => {
                let duration_secs = match self.concatenator.probe_duration(&cmd.output_path).await
                {
                    Ok(secs) => Some(secs),
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not probe combined audio duration");
                        None
                    }
                };

                tracing::info!(
                    path = %cmd.output_path.display(),
                    duration_secs = ?duration_secs,
                    "Combined audio saved"
                );

                ConcatOutcome::Combined {
                    output_path: cmd.output_path,
                    duration_secs,
                }
            }
            Err(e) => {
                if let ConcatError::Failed { status, stderr } = &e {
                    tracing::error!(
                        status = %status,
                        "An error occurred during audio concatenation"
                    );
                    tracing::error!("Media tool error output: {}", stderr);
                } else {
                    tracing::error!(error = %e, "An error occurred during audio concatenation");
                }
                ConcatOutcome::Failed(e)
            }
        };

        ConcatenateAudioResponse { inputs, outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Script;
    use crate::infrastructure::adapters::{FakeTtsClient, FileClipStorage};
    use tempfile::tempdir;

    fn script() -> Script {
        Script::parse(
            r#"{"1":{"alpha":"one"},"2":{"beta":"two"},"3":{"gamma":"three"}}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_voices_follow_mapping_with_fallback() {
        let temp_dir = tempdir().unwrap();
        let tts = Arc::new(FakeTtsClient::with_audio(b"mp3".to_vec()));
        let storage = Arc::new(FileClipStorage::new(temp_dir.path().join("audio_files")));
        let handler =
            SynthesizeScriptHandler::new(tts.clone(), storage, VoiceMapping::default(), "tts-1");

        let response = handler
            .handle(SynthesizeScript { script: script() })
            .await
            .unwrap();

        assert_eq!(response.clips.len(), 3);
        assert!(response.failures.is_empty());

        let voices: Vec<String> = tts.requests().into_iter().map(|r| r.voice).collect();
        assert_eq!(voices, vec!["nova", "onyx", "alloy"]);
        assert!(tts.requests().iter().all(|r| r.model == "tts-1"));
    }

    #[tokio::test]
    async fn test_failed_turn_does_not_abort_others() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("audio_files");
        let tts = Arc::new(FakeTtsClient::with_audio(b"mp3".to_vec()).fail_on_text("two"));
        let storage = Arc::new(FileClipStorage::new(&output_dir));
        let handler = SynthesizeScriptHandler::new(tts, storage, VoiceMapping::default(), "tts-1");

        let response = handler
            .handle(SynthesizeScript { script: script() })
            .await
            .unwrap();

        assert_eq!(response.clips.len(), 2);
        assert_eq!(response.failures.len(), 1);
        assert_eq!(response.failures[0].index, 2);
        assert_eq!(response.failures[0].speaker, "beta");
        assert!(output_dir.join("1.mp3").exists());
        assert!(!output_dir.join("2.mp3").exists());
        assert!(output_dir.join("3.mp3").exists());
    }
}
