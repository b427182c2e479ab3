//! # 歌词数据模型
//!
//! 一行歌词 ([`Line`]) 由主歌词组和背景人声组两个 [`Lyrics`] 组成，
//! 每个组包含按阅读顺序排列的逐字 [`Word`]、翻译和音译。
//!
//! [`Lyrics`] 只能通过 [`LyricsDraft::finalize`] 构造：空格重建和长元音分析
//! 按固定顺序各执行一次，之后整个组不可再修改。

use serde::{Deserialize, Serialize};

use crate::{
    processors::{
        spacing::reconstruct_spacing,
        vowel::{VowelAnalyzer, VowelSet},
    },
    utils::is_punctuation,
};

/// 一个带时间戳的最小单位（单词或音节）。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Word {
    /// 开始时间（秒）。只有未计时的装饰性文本才会缺失。
    pub begin: Option<f64>,
    /// 结束时间（秒）。
    pub end: Option<f64>,
    /// 原始文本，保留标点，不含两端空白。
    pub text: String,
    /// 源文本中紧跟在该词之后的空格数量。
    pub trailing_space_count: usize,
}

impl Word {
    /// 创建一个新的词。若 `end < begin`，`end` 会被修正为 `begin`。
    pub fn new(text: impl Into<String>, begin: Option<f64>, end: Option<f64>) -> Self {
        let end = match (begin, end) {
            (Some(begin), Some(end)) if end < begin => Some(begin),
            _ => end,
        };
        Self {
            begin,
            end,
            text: text.into(),
            trailing_space_count: 0,
        }
    }

    /// 文本加上尾随空格。
    #[must_use]
    pub fn content(&self) -> String {
        let mut content = String::with_capacity(self.text.len() + self.trailing_space_count);
        content.push_str(&self.text);
        content.extend(std::iter::repeat_n(' ', self.trailing_space_count));
        content
    }

    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        Some(self.end? - self.begin?)
    }

    #[must_use]
    pub fn starts_with_vowel(&self, vowels: &VowelSet) -> bool {
        self.letters().next().is_some_and(|c| vowels.contains(c))
    }

    #[must_use]
    pub fn ends_with_vowel(&self, vowels: &VowelSet) -> bool {
        self.letters().last().is_some_and(|c| vowels.contains(c))
    }

    /// 去掉标点后非空，且全部由元音组成。
    #[must_use]
    pub fn is_vowel(&self, vowels: &VowelSet) -> bool {
        let mut letters = self.letters().peekable();
        letters.peek().is_some() && letters.all(|c| vowels.contains(c))
    }

    fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.text
            .chars()
            .chain(std::iter::repeat_n(' ', self.trailing_space_count))
            .filter(|&c| !c.is_whitespace() && !is_punctuation(c))
    }
}

/// 一行歌词的翻译。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// BCP 47 语言代码
    pub locale: String,
    pub text: String,
}

/// 一组歌词（主歌词或背景人声），构造后不可变。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lyrics {
    begin_time: Option<f64>,
    end_time: Option<f64>,
    children: Vec<Word>,
    translations: Vec<Translation>,
    roman: Option<String>,
    vowels: Vec<f64>,
}

impl Lyrics {
    /// 显式指定的开始时间，否则为所有词中最早的开始时间。
    #[must_use]
    pub const fn begin_time(&self) -> Option<f64> {
        self.begin_time
    }

    /// 显式指定的结束时间，否则为所有词中最晚的结束时间。
    #[must_use]
    pub const fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    #[must_use]
    pub fn children(&self) -> &[Word] {
        &self.children
    }

    #[must_use]
    pub fn translations(&self) -> &[Translation] {
        &self.translations
    }

    #[must_use]
    pub fn translation(&self, locale: &str) -> Option<&Translation> {
        self.translations.iter().find(|t| t.locale == locale)
    }

    #[must_use]
    pub fn roman(&self) -> Option<&str> {
        self.roman.as_deref()
    }

    /// 长元音的开始时间，升序且不重复。
    #[must_use]
    pub fn vowels(&self) -> &[f64] {
        &self.vowels
    }

    /// `time` 是否为某个长元音的开始时间。
    #[must_use]
    pub fn is_vowel_start(&self, time: f64) -> bool {
        self.vowels.iter().any(|&start| (start - time).abs() < 1e-6)
    }

    /// 是否没有任何词。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// 是否有词、翻译或音译中的任意一种。
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.children.is_empty() || !self.translations.is_empty() || self.roman.is_some()
    }

    /// 所有词的 `content` 拼接而成的整行文本。
    #[must_use]
    pub fn text(&self) -> String {
        self.children.iter().map(Word::content).collect()
    }
}

/// 尚未经过后处理的歌词组，由解析器逐步填充。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LyricsDraft {
    /// 来自所属元素 `begin` 属性的开始时间。
    pub begin: Option<f64>,
    /// 来自所属元素 `end` 属性的结束时间。
    pub end: Option<f64>,
    pub words: Vec<Word>,
    pub translations: Vec<Translation>,
    pub roman: Option<String>,
}

impl LyricsDraft {
    #[must_use]
    pub fn seeded(begin: Option<f64>, end: Option<f64>) -> Self {
        Self {
            begin,
            end,
            ..Default::default()
        }
    }

    /// 添加一条翻译。同一语言已有翻译时忽略，返回 `false`。
    pub fn push_translation(&mut self, translation: Translation) -> bool {
        if self
            .translations
            .iter()
            .any(|existing| existing.locale == translation.locale)
        {
            return false;
        }
        self.translations.push(translation);
        true
    }

    /// 依次执行空格重建和长元音分析，得到不可变的 [`Lyrics`]。
    ///
    /// `raw_text` 是该组在源文档中的保留空白文本。
    #[must_use]
    pub fn finalize(self, raw_text: &str, analyzer: &VowelAnalyzer) -> Lyrics {
        let children = reconstruct_spacing(self.words, raw_text);
        let vowels = analyzer.analyze(&children);

        let begin_time = self.begin.or_else(|| {
            children
                .iter()
                .filter_map(|w| w.begin)
                .min_by(f64::total_cmp)
        });
        let end_time = self.end.or_else(|| {
            children
                .iter()
                .filter_map(|w| w.end)
                .max_by(f64::total_cmp)
        });

        Lyrics {
            begin_time,
            end_time,
            children,
            translations: self.translations,
            roman: self.roman,
            vowels,
        }
    }
}

/// 演唱者分组。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePosition {
    /// 主唱
    #[default]
    Lead,
    /// 其他演唱者
    Secondary,
}

impl LinePosition {
    /// 根据 `ttm:agent` 属性确定分组：缺失或 `v1` 为主唱，其余为其他演唱者。
    #[must_use]
    pub fn from_agent(agent: Option<&str>) -> Self {
        match agent.map(str::trim) {
            None | Some("" | "v1") => Self::Lead,
            Some(_) => Self::Secondary,
        }
    }
}

/// 文档中的一行歌词（对应一个 `<p>` 元素）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) index: usize,
    pub(crate) position: LinePosition,
    pub(crate) agent: Option<String>,
    pub(crate) song_part: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) lyrics: Lyrics,
    pub(crate) background_lyrics: Lyrics,
}

impl Line {
    #[must_use]
    pub fn new(
        index: usize,
        position: LinePosition,
        lyrics: Lyrics,
        background_lyrics: Lyrics,
    ) -> Self {
        Self {
            index,
            position,
            agent: None,
            song_part: None,
            key: None,
            lyrics,
            background_lyrics,
        }
    }

    /// 在文档中的序号，从 0 开始。高亮查询以此作为行的标识。
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn position(&self) -> LinePosition {
        self.position
    }

    /// 原始的 `ttm:agent` 值。
    #[must_use]
    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    /// `itunes:song-part`，例如 "Verse"、"Chorus"。
    #[must_use]
    pub fn song_part(&self) -> Option<&str> {
        self.song_part.as_deref()
    }

    /// `itunes:key`，例如 "L12"。
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[must_use]
    pub const fn lyrics(&self) -> &Lyrics {
        &self.lyrics
    }

    /// 背景人声。没有背景人声时为空组，而不是 `None`。
    #[must_use]
    pub const fn background_lyrics(&self) -> &Lyrics {
        &self.background_lyrics
    }

    #[must_use]
    pub fn begin_time(&self) -> Option<f64> {
        merge_times(
            self.lyrics.begin_time,
            self.background_lyrics.begin_time,
            f64::min,
        )
    }

    #[must_use]
    pub fn end_time(&self) -> Option<f64> {
        merge_times(
            self.lyrics.end_time,
            self.background_lyrics.end_time,
            f64::max,
        )
    }
}

fn merge_times(a: Option<f64>, b: Option<f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (time, None) | (None, time) => time,
    }
}

/// 一次解析得到的完整歌词文档。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LyricsDocument {
    lines: Vec<Line>,
    language: Option<String>,
}

impl LyricsDocument {
    #[must_use]
    pub const fn new(lines: Vec<Line>, language: Option<String>) -> Self {
        Self { lines, language }
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// 文档语言：`<tt xml:lang>`，缺失时为调用方声明的语言。
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
