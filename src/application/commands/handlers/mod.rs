//! Command Handlers 实现

mod audio_handlers;
mod script_handlers;

pub use audio_handlers::*;
pub use script_handlers::*;
