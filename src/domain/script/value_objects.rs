//! Script Context - Value Objects

use serde::{Deserialize, Serialize};

/// 说话人标识
///
/// 统一去除首尾空白并转为小写，`Alpha` 与 `alpha` 视为同一人
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Speaker(String);

impl Speaker {
    pub fn new(name: impl AsRef<str>) -> Result<Self, &'static str> {
        let name = name.as_ref().trim().to_lowercase();
        if name.is_empty() {
            return Err("说话人名称不能为空");
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_is_normalized() {
        let speaker = Speaker::new("  Alpha ").unwrap();
        assert_eq!(speaker.as_str(), "alpha");
        assert_eq!(speaker, Speaker::new("ALPHA").unwrap());
    }

    #[test]
    fn test_blank_speaker_rejected() {
        assert!(Speaker::new("   ").is_err());
        assert!(Speaker::new("").is_err());
    }
}
