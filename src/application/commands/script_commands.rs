//! Script Commands - 脚本生成命令

/// 根据上下文生成对话脚本
#[derive(Debug, Clone)]
pub struct GenerateScript {
    pub context: String,
}
