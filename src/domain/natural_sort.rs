//! 自然序排序
//!
//! 文件名中的连续数字按数值比较，其余部分按小写字符串比较，
//! 使 `t10.mp3` 排在 `t9.mp3` 之后而不是 `t1.mp3` 与 `t2.mp3` 之间

use std::cmp::Ordering;

/// 排序键片段
///
/// 键总是以 `Text` 开头，`Text` 与 `Number` 交替出现，
/// 因此两个键在同一位置上的片段类型总是一致的
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortSegment {
    Text(String),
    Number(u64),
}

impl PartialOrd for SortSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortSegment::Number(a), SortSegment::Number(b)) => a.cmp(b),
            (SortSegment::Text(a), SortSegment::Text(b)) => a.cmp(b),
            (SortSegment::Text(_), SortSegment::Number(_)) => Ordering::Less,
            (SortSegment::Number(_), SortSegment::Text(_)) => Ordering::Greater,
        }
    }
}

/// 计算自然序排序键
///
/// `"turn10.mp3"` → `[Text("turn"), Number(10), Text(".mp3")]`
///
/// 以数字开头或结尾时，首尾会补一个空的 `Text` 片段
pub fn natural_sort_key(s: &str) -> Vec<SortSegment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for ch in s.chars() {
        let is_digit = ch.is_ascii_digit();
        if is_digit != in_digits {
            segments.push(finish_segment(&mut current, in_digits));
            in_digits = is_digit;
        }
        current.push(ch);
    }

    segments.push(finish_segment(&mut current, in_digits));
    if in_digits {
        segments.push(SortSegment::Text(String::new()));
    }

    segments
}

fn finish_segment(current: &mut String, digits: bool) -> SortSegment {
    let run = std::mem::take(current);
    if digits {
        // 超出 u64 的数字串按最大值处理
        SortSegment::Number(run.parse().unwrap_or(u64::MAX))
    } else {
        SortSegment::Text(run.to_lowercase())
    }
}

/// 按自然序原地排序
pub fn sort_natural<T: AsRef<str>>(items: &mut [T]) {
    items.sort_by_cached_key(|item| natural_sort_key(item.as_ref()));
}
