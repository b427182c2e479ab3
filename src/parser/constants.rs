//! # TTML 解析器 - 常量定义
//!
//! 元素名为去掉命名空间前缀后的本地名，属性名为完整的限定名（含别名）。

pub(super) const TAG_HEAD: &str = "head";
pub(super) const TAG_BODY: &str = "body";
pub(super) const TAG_P: &str = "p";
pub(super) const TAG_BR: &str = "br";
pub(super) const TAG_ITUNES_METADATA: &str = "iTunesMetadata";
pub(super) const TAG_TRANSLATIONS: &str = "translations";
pub(super) const TAG_TRANSLITERATIONS: &str = "transliterations";
pub(super) const TAG_TRANSLATION: &str = "translation";
pub(super) const TAG_TRANSLITERATION: &str = "transliteration";
pub(super) const TAG_TEXT: &str = "text";

pub(super) const ATTR_BEGIN: &[&str] = &["begin"];
pub(super) const ATTR_END: &[&str] = &["end"];
pub(super) const ATTR_AGENT: &[&str] = &["ttm:agent", "agent"];
pub(super) const ATTR_ROLE: &[&str] = &["ttm:role", "role"];
pub(super) const ATTR_XML_LANG: &[&str] = &["xml:lang", "lang"];
pub(super) const ATTR_SONG_PART: &[&str] = &["itunes:songPart", "itunes:song-part"];
pub(super) const ATTR_ITUNES_KEY: &[&str] = &["itunes:key", "key"];
pub(super) const ATTR_FOR: &[&str] = &["for"];

/// 未声明语言的翻译使用的语言代码。
pub(super) const UNDETERMINED_LOCALE: &str = "und";
