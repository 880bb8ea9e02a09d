//! Script Context - 对话脚本限界上下文
//!
//! 职责:
//! - 脚本聚合（有序、已校验的对话轮次）
//! - 说话人值对象
//! - 生成结果的解析与校验

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Script;
pub use entities::Turn;
pub use errors::ScriptError;
pub use value_objects::Speaker;
