//! Script Context - Aggregate Root

use serde::Serialize;
use serde_json::Value;

use super::{ScriptError, Speaker, Turn};

/// Script 聚合根
///
/// 不变量:
/// - 至少一轮对话
/// - 轮次序号从 1 开始且连续
/// - 每轮恰好一个说话人，内容非空
/// - `turns` 按序号升序排列，即播放顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    turns: Vec<Turn>,
}

impl Script {
    /// 由轮次列表构建脚本，按序号排序后校验连续性
    pub fn new(mut turns: Vec<Turn>) -> Result<Self, ScriptError> {
        if turns.is_empty() {
            return Err(ScriptError::Empty);
        }

        turns.sort_by_key(|turn| turn.index);

        let mut previous: Option<u32> = None;
        for turn in &turns {
            if previous == Some(turn.index) {
                return Err(ScriptError::DuplicateIndex(turn.index));
            }
            let expected = previous.map_or(1, |index| index.saturating_add(1));
            if turn.index != expected {
                return Err(ScriptError::NonContiguous {
                    expected,
                    found: turn.index,
                });
            }
            previous = Some(turn.index);
        }

        Ok(Self { turns })
    }

    /// 解析生成服务返回的原始文本
    ///
    /// 期望结构: `{"1": {"alpha": "..."}, "2": {"beta": "..."}}`
    ///
    /// 任何一轮不合法都会导致整个回复被拒绝，不做部分挽救
    pub fn parse(raw: &str) -> Result<Self, ScriptError> {
        let value: Value = serde_json::from_str(raw.trim())
            .map_err(|e| ScriptError::InvalidJson(e.to_string()))?;

        let object = value.as_object().ok_or(ScriptError::NotAnObject)?;

        let mut turns = Vec::with_capacity(object.len());
        for (key, entry) in object {
            let index = parse_index(key)?;

            let entry = entry
                .as_object()
                .ok_or(ScriptError::InvalidTurn { index })?;

            let (speaker, text) = match (entry.len(), entry.iter().next()) {
                (1, Some(pair)) => pair,
                (count, _) => return Err(ScriptError::SpeakerCount { index, count }),
            };

            let speaker =
                Speaker::new(speaker).map_err(|_| ScriptError::InvalidSpeaker { index })?;

            let text = text
                .as_str()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .ok_or(ScriptError::EmptyText { index })?;

            turns.push(Turn::new(index, speaker, text));
        }

        Self::new(turns)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// 轮次序号只接受纯十进制数字且大于 0
fn parse_index(key: &str) -> Result<u32, ScriptError> {
    let trimmed = key.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ScriptError::InvalidIndex(key.to_string()));
    }

    match trimmed.parse::<u32>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(ScriptError::InvalidIndex(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_reply() {
        let script =
            Script::parse(r#"{"1":{"alpha":"Hi"},"2":{"beta":"Hello back"}}"#).unwrap();

        assert_eq!(script.len(), 2);
        assert_eq!(script.turns()[0].index, 1);
        assert_eq!(script.turns()[0].speaker.as_str(), "alpha");
        assert_eq!(script.turns()[0].text, "Hi");
        assert_eq!(script.turns()[1].speaker.as_str(), "beta");
        assert_eq!(script.turns()[1].text, "Hello back");
    }

    #[test]
    fn test_turns_ordered_numerically_not_lexically() {
        let mut entries = Vec::new();
        for i in (1..=11).rev() {
            entries.push(format!(r#""{}":{{"alpha":"line {}"}}"#, i, i));
        }
        let raw = format!("{{{}}}", entries.join(","));

        let script = Script::parse(&raw).unwrap();
        let indices: Vec<u32> = script.iter().map(|t| t.index).collect();
        assert_eq!(indices, (1..=11).collect::<Vec<_>>());
        assert_eq!(script.turns()[9].text, "line 10");
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let script = Script::parse("\n  {\"1\":{\"Alpha\":\"  Hi  \"}}\n").unwrap();
        assert_eq!(script.turns()[0].speaker.as_str(), "alpha");
        assert_eq!(script.turns()[0].text, "Hi");
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = Script::parse("Sure! Here is your script:").unwrap_err();
        assert!(matches!(err, ScriptError::InvalidJson(_)));
    }

    #[test]
    fn test_non_object_rejected() {
        assert_eq!(
            Script::parse(r#"[{"alpha":"Hi"}]"#).unwrap_err(),
            ScriptError::NotAnObject
        );
    }

    #[test]
    fn test_empty_object_rejected() {
        assert_eq!(Script::parse("{}").unwrap_err(), ScriptError::Empty);
    }

    #[test]
    fn test_bad_index_rejected() {
        assert_eq!(
            Script::parse(r#"{"one":{"alpha":"Hi"}}"#).unwrap_err(),
            ScriptError::InvalidIndex("one".to_string())
        );
        assert_eq!(
            Script::parse(r#"{"0":{"alpha":"Hi"}}"#).unwrap_err(),
            ScriptError::InvalidIndex("0".to_string())
        );
        assert_eq!(
            Script::parse(r#"{"-1":{"alpha":"Hi"}}"#).unwrap_err(),
            ScriptError::InvalidIndex("-1".to_string())
        );
    }

    #[test]
    fn test_gap_in_indices_rejected() {
        let err = Script::parse(r#"{"1":{"alpha":"Hi"},"3":{"beta":"Yo"}}"#).unwrap_err();
        assert_eq!(
            err,
            ScriptError::NonContiguous {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_index_not_starting_at_one_rejected() {
        let err = Script::parse(r#"{"2":{"alpha":"Hi"}}"#).unwrap_err();
        assert_eq!(
            err,
            ScriptError::NonContiguous {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_max_index_rejected_without_overflow() {
        let err = Script::parse(r#"{"4294967295":{"alpha":"Hi"}}"#).unwrap_err();
        assert_eq!(
            err,
            ScriptError::NonContiguous {
                expected: 1,
                found: u32::MAX
            }
        );

        let turns = vec![
            Turn::new(1, Speaker::new("alpha").unwrap(), "Hi"),
            Turn::new(u32::MAX, Speaker::new("beta").unwrap(), "Yo"),
        ];
        assert_eq!(
            Script::new(turns).unwrap_err(),
            ScriptError::NonContiguous {
                expected: 2,
                found: u32::MAX
            }
        );
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let err = Script::parse(r#"{"1":{"alpha":"Hi"},"01":{"beta":"Yo"}}"#).unwrap_err();
        assert_eq!(err, ScriptError::DuplicateIndex(1));
    }

    #[test]
    fn test_two_speakers_in_one_turn_rejected() {
        let err = Script::parse(r#"{"1":{"alpha":"Hi","beta":"Yo"}}"#).unwrap_err();
        assert_eq!(err, ScriptError::SpeakerCount { index: 1, count: 2 });

        let err = Script::parse(r#"{"1":{}}"#).unwrap_err();
        assert_eq!(err, ScriptError::SpeakerCount { index: 1, count: 0 });
    }

    #[test]
    fn test_turn_not_an_object_rejected() {
        let err = Script::parse(r#"{"1":"alpha: Hi"}"#).unwrap_err();
        assert_eq!(err, ScriptError::InvalidTurn { index: 1 });
    }

    #[test]
    fn test_empty_or_non_string_text_rejected() {
        let err = Script::parse(r#"{"1":{"alpha":"   "}}"#).unwrap_err();
        assert_eq!(err, ScriptError::EmptyText { index: 1 });

        let err = Script::parse(r#"{"1":{"alpha":42}}"#).unwrap_err();
        assert_eq!(err, ScriptError::EmptyText { index: 1 });
    }

    #[test]
    fn test_blank_speaker_rejected() {
        let err = Script::parse(r#"{"1":{" ":"Hi"}}"#).unwrap_err();
        assert_eq!(err, ScriptError::InvalidSpeaker { index: 1 });
    }
}
