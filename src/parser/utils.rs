//! # TTML 解析器的工具函数
//!
//! 属性提取、时间戳读取和 span 角色识别。

use strum_macros::EnumString;
use tracing::warn;

use super::constants::{ATTR_BEGIN, ATTR_END, ATTR_ROLE, ATTR_XML_LANG};
use crate::{markup::Element, timestamp::parse_timestamp};

/// `ttm:role` 属性可识别的取值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub(super) enum SpanRole {
    /// 翻译
    #[strum(serialize = "x-translation")]
    Translation,
    /// 罗马音
    #[strum(serialize = "x-roman")]
    Romanization,
    /// 背景人声容器
    #[strum(serialize = "x-bg")]
    Background,
}

/// 元素上可识别的角色标记。未知的角色按没有标记处理。
pub(super) fn span_role(element: &Element) -> Option<SpanRole> {
    element
        .attribute(ATTR_ROLE)
        .and_then(|role| role.trim().parse().ok())
}

/// 元素上是否有 `ttm:role` 属性，无论能否识别。
pub(super) fn has_unknown_role(element: &Element) -> bool {
    element.attribute(ATTR_ROLE).is_some() && span_role(element).is_none()
}

/// 读取并解析时间戳属性。格式错误时记录警告并视为缺失。
pub(super) fn get_time_attribute(element: &Element, names: &[&str]) -> Option<f64> {
    let value = element.attribute(names)?;
    match parse_timestamp(value) {
        Ok(seconds) => Some(seconds),
        Err(err) => {
            warn!(
                "<{}> 的时间戳 '{value}' 解析失败 ({err})。该时间戳将被忽略。",
                element.name()
            );
            None
        }
    }
}

/// 读取元素的 `begin` 和 `end`。结束早于开始时记录警告，由 `Word::new` 修正。
pub(super) fn get_time_range(element: &Element) -> (Option<f64>, Option<f64>) {
    let begin = get_time_attribute(element, ATTR_BEGIN);
    let end = get_time_attribute(element, ATTR_END);
    if let (Some(b), Some(e)) = (begin, end)
        && e < b
    {
        warn!(
            "<{}> 的时间戳无效 (begin {b}s > end {e}s)，结束时间将被修正为开始时间。",
            element.name()
        );
    }
    (begin, end)
}

/// 读取非空的 `xml:lang`。
pub(super) fn get_lang_attribute(element: &Element) -> Option<String> {
    element
        .attribute(ATTR_XML_LANG)
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Document;

    fn element(raw: &str) -> Element {
        Document::parse(raw).unwrap().root().clone()
    }

    #[test]
    fn test_span_role() {
        assert_eq!(
            span_role(&element(r#"<span ttm:role="x-bg"/>"#)),
            Some(SpanRole::Background)
        );
        assert_eq!(
            span_role(&element(r#"<span role="x-translation"/>"#)),
            Some(SpanRole::Translation)
        );
        assert_eq!(
            span_role(&element(r#"<span ttm:role=" x-roman "/>"#)),
            Some(SpanRole::Romanization)
        );
        assert_eq!(span_role(&element(r#"<span ttm:role="x-unknown"/>"#)), None);
        assert!(has_unknown_role(&element(r#"<span ttm:role="x-unknown"/>"#)));
        assert_eq!(span_role(&element("<span/>")), None);
    }

    #[test]
    fn test_malformed_time_is_absent() {
        let span = element(r#"<span begin="00:01.5" end="soon"/>"#);
        assert_eq!(get_time_range(&span), (Some(1.5), None));
    }

    #[test]
    fn test_lang_attribute() {
        assert_eq!(
            get_lang_attribute(&element(r#"<span xml:lang="zh-Hans"/>"#)).as_deref(),
            Some("zh-Hans")
        );
        assert_eq!(get_lang_attribute(&element(r#"<span xml:lang=" "/>"#)), None);
    }
}
