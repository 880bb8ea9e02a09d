//! Media Adapter - 外部媒体工具

mod ffmpeg_concatenator;

pub use ffmpeg_concatenator::{FfmpegConcatenator, FfmpegConfig};
