//! # TTML 解析器 - Head 处理模块
//!
//! 读取 `<head><metadata><iTunesMetadata>` 中按 `itunes:key` 关联的逐行翻译与音译：
//!
//! ```xml
//! <iTunesMetadata>
//!   <translations>
//!     <translation xml:lang="zh-Hans">
//!       <text for="L1">你好<span ttm:role="x-bg">（背景）</span></text>
//!     </translation>
//!   </translations>
//! </iTunesMetadata>
//! ```

use std::collections::HashMap;

use tracing::debug;

use super::{
    constants::{
        ATTR_FOR, TAG_HEAD, TAG_ITUNES_METADATA, TAG_TEXT, TAG_TRANSLATION, TAG_TRANSLATIONS,
        TAG_TRANSLITERATION, TAG_TRANSLITERATIONS,
    },
    utils::{SpanRole, get_lang_attribute, span_role},
};
use crate::{
    markup::Element,
    utils::{normalize_text_whitespace, strip_enclosing_punctuation},
};

/// 某一行在 `<head>` 中的一条辅助文本。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct KeyedText {
    pub(super) lang: Option<String>,
    pub(super) main: Option<String>,
    pub(super) background: Option<String>,
}

/// 从 `<head>` 中读取的所有逐行辅助文本，以 `itunes:key` 为索引。
#[derive(Debug, Default)]
pub(super) struct HeadAnnotations {
    translations: HashMap<String, Vec<KeyedText>>,
    transliterations: HashMap<String, Vec<KeyedText>>,
}

impl HeadAnnotations {
    pub(super) fn translations_for(&self, key: &str) -> &[KeyedText] {
        self.translations.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub(super) fn transliterations_for(&self, key: &str) -> &[KeyedText] {
        self.transliterations.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.translations.is_empty() && self.transliterations.is_empty()
    }
}

pub(super) fn read_head_annotations(root: &Element) -> HeadAnnotations {
    let Some(itunes_metadata) = root
        .find_descendant(TAG_HEAD)
        .and_then(|head| head.find_descendant(TAG_ITUNES_METADATA))
    else {
        return HeadAnnotations::default();
    };

    let annotations = HeadAnnotations {
        translations: read_container(itunes_metadata, TAG_TRANSLATIONS, TAG_TRANSLATION),
        transliterations: read_container(
            itunes_metadata,
            TAG_TRANSLITERATIONS,
            TAG_TRANSLITERATION,
        ),
    };
    debug!(
        "从 <iTunesMetadata> 读取了 {} 行翻译、{} 行音译",
        annotations.translations.len(),
        annotations.transliterations.len()
    );
    annotations
}

/// 读取 `<translations>` 或 `<transliterations>` 容器。
fn read_container(
    itunes_metadata: &Element,
    container_tag: &str,
    entry_tag: &str,
) -> HashMap<String, Vec<KeyedText>> {
    let mut by_key: HashMap<String, Vec<KeyedText>> = HashMap::new();

    let entries = itunes_metadata
        .child_elements()
        .filter(|e| e.name() == container_tag)
        .flat_map(|container| container.child_elements())
        .filter(|e| e.name() == entry_tag);

    for entry in entries {
        let lang = get_lang_attribute(entry);
        for text_element in entry.child_elements().filter(|e| e.name() == TAG_TEXT) {
            let Some(key) = text_element.attribute(ATTR_FOR) else {
                debug!("<{entry_tag}> 中的 <text> 缺少 for 属性，已忽略");
                continue;
            };

            let main = normalize_text_whitespace(
                &text_element.preserved_text_where(|e| span_role(e) != Some(SpanRole::Background)),
            );
            let background = text_element
                .child_elements()
                .filter(|e| span_role(e) == Some(SpanRole::Background))
                .map(|e| strip_enclosing_punctuation(&e.preserved_text()))
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            by_key.entry(key.to_owned()).or_default().push(KeyedText {
                lang: lang.clone(),
                main: Some(main).filter(|t| !t.is_empty()),
                background: Some(background).filter(|t| !t.is_empty()),
            });
        }
    }

    by_key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Document;

    #[test]
    fn test_read_translations_and_transliterations() {
        let doc = Document::parse(
            r#"<tt xmlns:ttm="http://www.w3.org/ns/ttml#metadata">
              <head><metadata>
                <iTunesMetadata xmlns="http://music.apple.com/lyric-ttml-internal">
                  <translations>
                    <translation type="replacement" xml:lang="zh-Hans">
                      <text for="L1">你好 <span ttm:role="x-bg">（背景）</span></text>
                      <text for="L2">再见</text>
                    </translation>
                  </translations>
                  <transliterations>
                    <transliteration xml:lang="ja-Latn">
                      <text for="L1">konnichiwa</text>
                    </transliteration>
                  </transliterations>
                </iTunesMetadata>
              </metadata></head>
              <body/>
            </tt>"#,
        )
        .unwrap();

        let head = read_head_annotations(doc.root());
        assert!(!head.is_empty());

        let l1 = head.translations_for("L1");
        assert_eq!(l1.len(), 1);
        assert_eq!(l1[0].lang.as_deref(), Some("zh-Hans"));
        assert_eq!(l1[0].main.as_deref(), Some("你好"));
        assert_eq!(l1[0].background.as_deref(), Some("背景"));

        assert_eq!(head.translations_for("L2")[0].main.as_deref(), Some("再见"));
        assert!(head.translations_for("L2")[0].background.is_none());

        assert_eq!(
            head.transliterations_for("L1")[0].main.as_deref(),
            Some("konnichiwa")
        );
        assert!(head.translations_for("L3").is_empty());
    }

    #[test]
    fn test_missing_head_is_empty() {
        let doc = Document::parse("<tt><body/></tt>").unwrap();
        assert!(read_head_annotations(doc.root()).is_empty());
    }
}
