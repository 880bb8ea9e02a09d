//! Script Command Handlers

use std::sync::Arc;

use crate::application::commands::GenerateScript;
use crate::application::error::ApplicationError;
use crate::application::ports::{ChatCompletionPort, ChatMessage, GenerationRequest};
use crate::domain::{system_instruction, user_instruction, Persona, Script, DEFAULT_PERSONAS};

/// GenerateScript Handler - 生成对话脚本
pub struct GenerateScriptHandler {
    chat: Arc<dyn ChatCompletionPort>,
    model: String,
    personas: Vec<Persona>,
}

impl GenerateScriptHandler {
    pub fn new(chat: Arc<dyn ChatCompletionPort>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
            personas: DEFAULT_PERSONAS.to_vec(),
        }
    }

    /// 构建发送给生成服务的请求
    pub fn build_request(&self, context: &str) -> GenerationRequest {
        GenerationRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_instruction(&self.personas)),
                ChatMessage::user(user_instruction(&self.personas, context)),
            ],
            json_response: true,
        }
    }

    pub async fn handle(&self, cmd: GenerateScript) -> Result<Script, ApplicationError> {
        let request = self.build_request(&cmd.context);

        tracing::info!(
            model = %request.model,
            context_len = cmd.context.len(),
            "Requesting podcast script"
        );

        let reply = self.chat.complete(request).await?;

        let script = Script::parse(&reply).map_err(|e| {
            tracing::error!(error = %e, reply_len = reply.len(), "Malformed generation output");
            tracing::debug!(reply = %reply, "Rejected reply");
            e
        })?;

        tracing::info!(turns = script.len(), "Podcast script generated");

        Ok(script)
    }
}
