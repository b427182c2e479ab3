/// 规范化文本中的空白字符
pub fn normalize_text_whitespace(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// 是否为标点符号（ASCII 及常见的全角、引号类符号）。
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '‘' | '’'
                | '“'
                | '”'
                | '…'
                | '—'
                | '–'
                | '「'
                | '」'
                | '『'
                | '』'
                | '（'
                | '）'
                | '【'
                | '】'
                | '《'
                | '》'
                | '，'
                | '。'
                | '！'
                | '？'
                | '、'
                | '：'
                | '；'
                | '¡'
                | '¿'
                | '«'
                | '»'
        )
}

/// 清理文本两端的括号和引号（单个或成对），并规范化空白。
pub fn strip_enclosing_punctuation(text: &str) -> String {
    const ENCLOSING: [char; 14] = [
        '(', ')', '（', '）', '[', ']', '「', '」', '『', '』', '"', '“', '”', '\'',
    ];
    let stripped = text
        .trim()
        .trim_matches(|c: char| c.is_whitespace() || ENCLOSING.contains(&c));
    normalize_text_whitespace(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_whitespace() {
        assert_eq!(normalize_text_whitespace("  hello   world  "), "hello world");
        assert_eq!(normalize_text_whitespace("\n\t  foo \r\n bar\t"), "foo bar");
        assert_eq!(normalize_text_whitespace("single"), "single");
        assert_eq!(normalize_text_whitespace("   "), "");
        assert_eq!(normalize_text_whitespace(""), "");
    }

    #[test]
    fn test_strip_enclosing_punctuation() {
        assert_eq!(strip_enclosing_punctuation("(hello)"), "hello");
        assert_eq!(strip_enclosing_punctuation("（你好）"), "你好");
        assert_eq!(strip_enclosing_punctuation(" ( hello  world ) "), "hello world");
        assert_eq!(strip_enclosing_punctuation("(unmatched"), "unmatched");
        assert_eq!(strip_enclosing_punctuation("「こんにちは」"), "こんにちは");
        assert_eq!(strip_enclosing_punctuation("Why?"), "Why?");
        assert_eq!(strip_enclosing_punctuation("()"), "");
    }

    #[test]
    fn test_is_punctuation() {
        assert!(is_punctuation(','));
        assert!(is_punctuation('！'));
        assert!(is_punctuation('’'));
        assert!(!is_punctuation('a'));
        assert!(!is_punctuation('愛'));
        assert!(!is_punctuation(' '));
    }
}
