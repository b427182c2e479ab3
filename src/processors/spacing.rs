//! 空格重建器。
//!
//! 解析后的词不包含原文中的空格。这里把每个词在原始文本中依次替换成
//! `起始符 + 序号 + 终止符` 形式的位置标记，再统计相邻两个标记之间的空白数量，
//! 作为前一个词的尾随空格数。

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::Word;

const MARKER_START: char = '\u{F8FE}';
const MARKER_TERMINATOR: char = '\u{F8FF}';

static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{F8FE}([0-9]+)\u{F8FF}").unwrap());

/// 根据原始文本恢复每个词的 `trailing_space_count`。
///
/// 每个词只消费一处匹配，并且从上一个标记之后开始查找，所以重复出现的相同单词
/// 按处理顺序一一对应。找不到的词保持 0 个空格，此函数从不失败。
#[must_use]
pub fn reconstruct_spacing(words: Vec<Word>, raw_text: &str) -> Vec<Word> {
    let mut working = raw_text.to_owned();
    let mut cursor = 0;

    for (index, word) in words.iter().enumerate() {
        if word.text.is_empty() {
            continue;
        }
        let Some(offset) = working[cursor..].find(&word.text) else {
            debug!("在原始文本中找不到 '{}'，其尾随空格保持为 0", word.text.escape_debug());
            continue;
        };
        let start = cursor + offset;
        let marker = format!("{MARKER_START}{index}{MARKER_TERMINATOR}");
        working.replace_range(start..start + word.text.len(), &marker);
        cursor = start + marker.len();
    }

    let markers: Vec<(usize, usize, usize)> = MARKER_REGEX
        .captures_iter(&working)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let index = caps.get(1)?.as_str().parse::<usize>().ok()?;
            Some((index, whole.start(), whole.end()))
        })
        .collect();

    let mut counts = vec![0; words.len()];
    for pair in markers.windows(2) {
        let (index, _, end) = pair[0];
        let (_, next_start, _) = pair[1];
        let spaces = working[end..next_start]
            .chars()
            .take_while(|c| c.is_whitespace())
            .count();
        if let Some(count) = counts.get_mut(index) {
            *count = spaces;
        }
    }

    words
        .into_iter()
        .zip(counts)
        .map(|(word, trailing_space_count)| Word {
            trailing_space_count,
            ..word
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<Word> {
        texts.iter().map(|t| Word::new(*t, None, None)).collect()
    }

    fn counts(result: &[Word]) -> Vec<usize> {
        result.iter().map(|w| w.trailing_space_count).collect()
    }

    #[test]
    fn test_spaces_between_words() {
        let result = reconstruct_spacing(words(&["Hey", "you", "there"]), "Hey you  there");
        assert_eq!(counts(&result), [1, 2, 0]);
        let joined: String = result.iter().map(Word::content).collect();
        assert_eq!(joined, "Hey you  there");
    }

    #[test]
    fn test_syllables_without_spaces() {
        let result = reconstruct_spacing(words(&["Beau", "ti", "ful", "day"]), "Beautiful day");
        assert_eq!(counts(&result), [0, 0, 1, 0]);
    }

    #[test]
    fn test_repeated_words_follow_processing_order() {
        let result = reconstruct_spacing(words(&["la", "la", "la"]), "la la  la");
        assert_eq!(counts(&result), [1, 2, 0]);
    }

    #[test]
    fn test_digits_in_words_do_not_confuse_markers() {
        let result = reconstruct_spacing(words(&["1", "2", "10"]), "1 2 10");
        assert_eq!(counts(&result), [1, 1, 0]);
    }

    #[test]
    fn test_missing_word_keeps_default_spacing() {
        let result = reconstruct_spacing(words(&["Hello", "ghost", "world"]), "Hello world");
        assert_eq!(counts(&result), [1, 0, 0]);
    }

    #[test]
    fn test_trailing_whitespace_after_last_word_is_ignored() {
        let result = reconstruct_spacing(words(&["end"]), "end   ");
        assert_eq!(counts(&result), [0]);
    }

    #[test]
    fn test_unicode_text() {
        let result = reconstruct_spacing(words(&["夜に", "駆ける", "café"]), "夜に 駆ける café");
        assert_eq!(counts(&result), [1, 1, 0]);
    }
}
