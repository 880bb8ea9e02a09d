//! 说话人音色映射

use std::collections::HashMap;

use super::script::Speaker;

/// 未识别说话人使用的默认音色
pub const DEFAULT_VOICE: &str = "alloy";

/// 说话人 → 音色 映射
///
/// 键按 [`Speaker`] 的规则归一化，查不到时回退到默认音色
#[derive(Debug, Clone)]
pub struct VoiceMapping {
    voices: HashMap<String, String>,
    default_voice: String,
}

impl VoiceMapping {
    pub fn new(default_voice: impl Into<String>) -> Self {
        Self {
            voices: HashMap::new(),
            default_voice: default_voice.into(),
        }
    }

    pub fn with_voice(mut self, speaker: impl AsRef<str>, voice: impl Into<String>) -> Self {
        self.insert(speaker, voice);
        self
    }

    pub fn insert(&mut self, speaker: impl AsRef<str>, voice: impl Into<String>) {
        if let Ok(speaker) = Speaker::new(speaker) {
            self.voices.insert(speaker.as_str().to_string(), voice.into());
        }
    }

    pub fn voice_for(&self, speaker: &Speaker) -> &str {
        self.voices
            .get(speaker.as_str())
            .map(String::as_str)
            .unwrap_or(&self.default_voice)
    }

    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }
}

impl Default for VoiceMapping {
    fn default() -> Self {
        Self::new(DEFAULT_VOICE)
            .with_voice("alpha", "nova")
            .with_voice("beta", "onyx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speaker(name: &str) -> Speaker {
        Speaker::new(name).unwrap()
    }

    #[test]
    fn test_default_mapping() {
        let mapping = VoiceMapping::default();
        assert_eq!(mapping.voice_for(&speaker("alpha")), "nova");
        assert_eq!(mapping.voice_for(&speaker("Beta")), "onyx");
    }

    #[test]
    fn test_unknown_speaker_falls_back() {
        let mapping = VoiceMapping::default();
        assert_eq!(mapping.voice_for(&speaker("gamma")), DEFAULT_VOICE);
    }

    #[test]
    fn test_custom_keys_are_normalized() {
        let mapping = VoiceMapping::new("echo").with_voice(" Host ", "shimmer");
        assert_eq!(mapping.voice_for(&speaker("host")), "shimmer");
        assert_eq!(mapping.voice_for(&speaker("guest")), "echo");
    }
}
