//! # 高亮查询
//!
//! 给定播放时间，找出当前处于激活状态的行或词。激活区间两端都包含在内，
//! 相邻两行共享同一个边界时间戳时，在该时刻两行都处于激活状态。
//!
//! 查询没有内部状态，每次都线性扫描，因此按时间递增的连续查询和任意跳转
//! 得到的结果都一样。

use std::{collections::BTreeSet, ops::RangeInclusive};

use crate::model::{Line, Lyrics, LyricsDocument, Word};

/// 带有时间区间的歌词元素。
pub trait Timed {
    fn begin_time(&self) -> Option<f64>;

    fn end_time(&self) -> Option<f64>;

    /// `begin <= time <= end`。缺少任一端时间时永远不激活。
    fn is_active_at(&self, time: f64) -> bool {
        match (self.begin_time(), self.end_time()) {
            (Some(begin), Some(end)) => begin <= time && time <= end,
            _ => false,
        }
    }
}

impl Timed for Word {
    fn begin_time(&self) -> Option<f64> {
        self.begin
    }

    fn end_time(&self) -> Option<f64> {
        self.end
    }
}

impl Timed for Lyrics {
    fn begin_time(&self) -> Option<f64> {
        Self::begin_time(self)
    }

    fn end_time(&self) -> Option<f64> {
        Self::end_time(self)
    }
}

impl Timed for Line {
    fn begin_time(&self) -> Option<f64> {
        Self::begin_time(self)
    }

    fn end_time(&self) -> Option<f64> {
        Self::end_time(self)
    }
}

/// 在 `time` 时刻激活的所有行的 [`Line::index`]。
#[must_use]
pub fn active_indices(lines: &[Line], time: f64) -> BTreeSet<usize> {
    lines
        .iter()
        .filter(|line| line.is_active_at(time))
        .map(Line::index)
        .collect()
}

/// 激活行序号的最小值到最大值。没有激活行时返回 `None`。
#[must_use]
pub fn active_range(lines: &[Line], time: f64) -> Option<RangeInclusive<usize>> {
    let active = active_indices(lines, time);
    Some(*active.first()?..=*active.last()?)
}

/// 在 `time` 时刻激活的词在 [`Lyrics::children`] 中的位置。
#[must_use]
pub fn active_word_indices(lyrics: &Lyrics, time: f64) -> BTreeSet<usize> {
    lyrics
        .children()
        .iter()
        .enumerate()
        .filter(|(_, word)| word.is_active_at(time))
        .map(|(i, _)| i)
        .collect()
}

impl LyricsDocument {
    /// 见 [`active_indices`]。
    #[must_use]
    pub fn active_indices(&self, time: f64) -> BTreeSet<usize> {
        active_indices(self.lines(), time)
    }

    /// 见 [`active_range`]。
    #[must_use]
    pub fn active_range(&self, time: f64) -> Option<RangeInclusive<usize>> {
        active_range(self.lines(), time)
    }
}
