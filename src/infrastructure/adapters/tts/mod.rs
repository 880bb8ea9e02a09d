//! TTS Adapter - 语音合成客户端实现

mod fake_tts_client;
mod openai_speech_client;

pub use fake_tts_client::FakeTtsClient;
pub use openai_speech_client::OpenAiSpeechClient;
