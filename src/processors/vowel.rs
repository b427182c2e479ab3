//! 长元音分析器。
//!
//! 找出一组歌词中持续时间足够长、需要“拖长”动画的元音，记录其开始时间。
//! 记录的是开始时间而非确认时刻，渲染层据此在长音开始时就触发动画。

use crate::{
    config::{DEFAULT_SUSTAIN_THRESHOLD_SECS, ParsingOptions},
    model::Word,
};

const TIME_EPSILON: f64 = 1e-6;

const LATIN_VOWELS: &[char] = &[
    'a', 'e', 'i', 'o', 'u', 'y', 'á', 'à', 'â', 'ä', 'ã', 'å', 'æ', 'é', 'è', 'ê', 'ë', 'í',
    'ì', 'î', 'ï', 'ó', 'ò', 'ô', 'ö', 'õ', 'ø', 'œ', 'ú', 'ù', 'û', 'ü', 'ý', 'ÿ',
];

/// 元音字符表（小写），匹配时不区分大小写。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VowelSet(&'static [char]);

impl VowelSet {
    /// 拉丁字母元音，含常见的带变音符号字母。
    pub const LATIN: Self = Self(LATIN_VOWELS);

    #[must_use]
    pub const fn new(chars: &'static [char]) -> Self {
        Self(chars)
    }

    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        c.to_lowercase().all(|lower| self.0.contains(&lower))
    }
}

impl Default for VowelSet {
    fn default() -> Self {
        Self::LATIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VowelAnalyzer {
    vowels: VowelSet,
    threshold: f64,
}

impl Default for VowelAnalyzer {
    fn default() -> Self {
        Self::new(VowelSet::LATIN, DEFAULT_SUSTAIN_THRESHOLD_SECS)
    }
}

impl VowelAnalyzer {
    #[must_use]
    pub const fn new(vowels: VowelSet, threshold: f64) -> Self {
        Self { vowels, threshold }
    }

    #[must_use]
    pub const fn from_options(options: &ParsingOptions) -> Self {
        Self::new(VowelSet::LATIN, options.sustain_threshold_secs)
    }

    #[must_use]
    pub const fn vowels(&self) -> &VowelSet {
        &self.vowels
    }

    /// 单次遍历，返回升序、不重复的长元音开始时间。
    ///
    /// - 没有进行中的元音时：词为元音或以元音结尾则从其 `begin` 开始一段；
    ///   若该词本身已达到阈值，立即记录。
    /// - 有进行中的元音时：遇到非元音词、以元音开头的词（新的起音）
    ///   或最后一个词即结束该段，若 `end - 开始时间` 达到阈值则记录开始时间。
    ///
    /// 缺少开始或结束时间的词会被跳过。
    #[must_use]
    pub fn analyze(&self, words: &[Word]) -> Vec<f64> {
        let timed: Vec<(&Word, f64, f64)> = words
            .iter()
            .filter_map(|word| Some((word, word.begin?, word.end?)))
            .collect();

        let mut starts = Vec::new();
        let mut open_start: Option<f64> = None;

        for (position, &(word, begin, end)) in timed.iter().enumerate() {
            match open_start {
                None => {
                    if word.is_vowel(&self.vowels) || word.ends_with_vowel(&self.vowels) {
                        open_start = Some(begin);
                        if self.reaches_threshold(end - begin) {
                            starts.push(begin);
                        }
                    }
                }
                Some(start) => {
                    let is_last = position + 1 == timed.len();
                    if !word.is_vowel(&self.vowels)
                        || word.starts_with_vowel(&self.vowels)
                        || is_last
                    {
                        if self.reaches_threshold(end - start) {
                            starts.push(start);
                        }
                        open_start = None;
                    }
                }
            }
        }

        starts.sort_by(f64::total_cmp);
        starts.dedup_by(|a, b| (*a - *b).abs() < TIME_EPSILON);
        starts
    }

    fn reaches_threshold(&self, duration: f64) -> bool {
        duration + TIME_EPSILON >= self.threshold
    }
}
