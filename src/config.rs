use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// 判定长元音时使用的默认时长阈值（秒）。
pub const DEFAULT_SUSTAIN_THRESHOLD_SECS: f64 = 1.0;

/// TTML 解析选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct ParsingOptions {
    /// 元数据中声明的歌曲语言。当 `<tt>` 未指定 `xml:lang` 时作为文档语言。
    pub declared_locale: Option<String>,
    /// 翻译 `<span>` 未指定 `xml:lang` 时使用的语言代码。
    pub translation_locale: Option<String>,
    /// 一个元音持续多久（秒）才被视为需要“拖长”动画的长元音。
    pub sustain_threshold_secs: f64,
}

impl Default for ParsingOptions {
    fn default() -> Self {
        Self {
            declared_locale: None,
            translation_locale: None,
            sustain_threshold_secs: DEFAULT_SUSTAIN_THRESHOLD_SECS,
        }
    }
}
