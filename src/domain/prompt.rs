//! 脚本生成提示词
//!
//! 系统指令描述输出结构，用户指令描述主持人设定并附上上下文

/// 播客主持人设定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// 主持人名称，同时作为脚本中的说话人键（小写）
    pub name: &'static str,
    /// 性格描述
    pub traits: &'static str,
}

/// 默认的两位主持人
pub const DEFAULT_PERSONAS: &[Persona] = &[
    Persona {
        name: "Alpha",
        traits: "inquisitive and curious",
    },
    Persona {
        name: "Beta",
        traits: "patient and structured",
    },
];

/// 系统指令：约束回复为按轮次编号的 JSON 对象
pub fn system_instruction(personas: &[Persona]) -> String {
    let example = personas
        .iter()
        .enumerate()
        .map(|(i, p)| format!(r#""{}": {{"{}": "..."}}"#, i + 1, p.name.to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a helpful podcast-style script generator. \
         Answer with a single JSON object with the structure {{{}, ...}}. \
         Keys are turn numbers starting at 1 and counting up without gaps. \
         Each turn is an object with exactly one presenter name mapped to what that presenter says.",
        example
    )
}

/// 用户指令：主持人设定、语音合成约束、上下文
pub fn user_instruction(personas: &[Persona], context: &str) -> String {
    let cast = personas
        .iter()
        .map(|p| format!("{} is {}.", p.name, p.traits))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "Write a script for a {}-presenter podcast. {} \
         The generated text will be used for speech synthesis, so avoid symbols or long lists \
         and focus on a narrative style. Here is the context: \n{}",
        personas.len(),
        cast,
        context
    )
}
