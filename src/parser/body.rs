//! # TTML 解析器 - Body 处理模块
//!
//! 把一个 `<p>` 元素构建为 [`Line`]：主歌词组直接来自 `<p>` 的子节点，
//! 背景人声组来自 `ttm:role="x-bg"` 的 `<span>`。

use tracing::debug;

use super::{
    constants::{ATTR_AGENT, ATTR_ITUNES_KEY, ATTR_SONG_PART, TAG_BR, UNDETERMINED_LOCALE},
    head::{HeadAnnotations, KeyedText},
    utils::{SpanRole, get_lang_attribute, get_time_range, has_unknown_role, span_role},
};
use crate::{
    config::ParsingOptions,
    markup::{Element, Node},
    model::{Line, LinePosition, LyricsDraft, Translation, Word},
    processors::vowel::VowelAnalyzer,
    utils::{normalize_text_whitespace, strip_enclosing_punctuation},
};

/// 构建每一行时共享的只读上下文。
pub(super) struct LineContext<'a> {
    pub(super) options: &'a ParsingOptions,
    pub(super) analyzer: &'a VowelAnalyzer,
    pub(super) head: &'a HeadAnnotations,
}

impl LineContext<'_> {
    fn translation_locale(&self, lang: Option<String>) -> String {
        lang.or_else(|| self.options.translation_locale.clone())
            .unwrap_or_else(|| UNDETERMINED_LOCALE.to_owned())
    }
}

/// 把 `<p>` 构建为一行。没有任何歌词内容的 `<p>` 同样得到一行，
/// 两个歌词组都为空，序号保持为 `<p>` 的出现次序。
pub(super) fn build_line(
    p: &Element,
    inherited_song_part: Option<&str>,
    index: usize,
    ctx: &LineContext<'_>,
) -> Line {
    let agent = p.attribute(ATTR_AGENT).map(str::to_owned);
    let key = p.attribute(ATTR_ITUNES_KEY).map(str::to_owned);
    let song_part = p
        .attribute(ATTR_SONG_PART)
        .or(inherited_song_part)
        .map(str::to_owned);

    let (begin, end) = get_time_range(p);
    let mut main = LyricsDraft::seeded(begin, end);
    let mut background_spans = Vec::new();
    walk_group(p, (begin, end), &mut main, Some(&mut background_spans), ctx);

    let mut background = LyricsDraft::default();
    let mut background_raw = String::new();
    for span in background_spans {
        let (span_begin, span_end) = get_time_range(span);
        background.begin = min_time(background.begin, span_begin);
        background.end = max_time(background.end, span_end);
        walk_group(span, (span_begin, span_end), &mut background, None, ctx);

        if !background_raw.is_empty() {
            background_raw.push(' ');
        }
        background_raw.push_str(&span.preserved_text_where(|e| span_role(e).is_none()));
    }

    if let Some(key) = key.as_deref()
        && !ctx.head.is_empty()
    {
        apply_head_annotations(key, &mut main, &mut background, ctx);
    }

    let main_raw = p.preserved_text_where(|e| span_role(e).is_none());
    let lyrics = main.finalize(&main_raw, ctx.analyzer);
    let background_lyrics = background.finalize(&background_raw, ctx.analyzer);

    if !lyrics.has_content() && !background_lyrics.has_content() {
        debug!("第 {index} 行 (key: {key:?}) 没有任何歌词内容");
    }

    Line {
        index,
        position: LinePosition::from_agent(agent.as_deref()),
        agent,
        song_part,
        key,
        lyrics,
        background_lyrics,
    }
}

/// 遍历一个歌词组容器的直接子节点，把内容写入 `draft`。
///
/// `seed` 是容器自身的时间，供无时间的文本片段继承。
/// `background_spans` 为 `None` 时表示已经位于背景人声内部，
/// 此时再遇到的背景 `<span>` 会被跳过。
fn walk_group<'e>(
    container: &'e Element,
    seed: (Option<f64>, Option<f64>),
    draft: &mut LyricsDraft,
    mut background_spans: Option<&mut Vec<&'e Element>>,
    ctx: &LineContext<'_>,
) {
    for node in container.children() {
        let element = match node {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    draft.words.push(Word::new(trimmed, seed.0, seed.1));
                }
                continue;
            }
            Node::Element(element) => element,
        };

        if element.name() == TAG_BR {
            continue;
        }

        match span_role(element) {
            None => push_word(element, draft),
            Some(SpanRole::Translation) => {
                let text = strip_enclosing_punctuation(&element.preserved_text());
                if text.is_empty() {
                    continue;
                }
                let locale = ctx.translation_locale(get_lang_attribute(element));
                if !draft.push_translation(Translation {
                    locale: locale.clone(),
                    text,
                }) {
                    debug!("语言 '{locale}' 已有翻译，忽略重复的翻译");
                }
            }
            Some(SpanRole::Romanization) => {
                let text = normalize_text_whitespace(&element.preserved_text());
                if text.is_empty() {
                    continue;
                }
                if draft.roman.is_none() {
                    draft.roman = Some(text);
                } else {
                    debug!("已有音译，忽略重复的音译 '{text}'");
                }
            }
            Some(SpanRole::Background) => match background_spans.as_deref_mut() {
                Some(spans) => spans.push(element),
                None => debug!("背景人声中嵌套了背景人声，已跳过"),
            },
        }
    }
}

/// 无角色（或角色无法识别）的元素成为一个词，只使用元素自身的时间。
fn push_word(element: &Element, draft: &mut LyricsDraft) {
    if has_unknown_role(element) {
        debug!("<{}> 的角色无法识别，按普通音节处理", element.name());
    }
    let text = element.preserved_text();
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let (begin, end) = get_time_range(element);
    draft.words.push(Word::new(text, begin, end));
}

/// 把 `<head>` 中按 `itunes:key` 关联的翻译与音译补充到这一行。
/// 行内已有的同语言翻译和音译优先。
fn apply_head_annotations(
    key: &str,
    main: &mut LyricsDraft,
    background: &mut LyricsDraft,
    ctx: &LineContext<'_>,
) {
    for entry in ctx.head.translations_for(key) {
        let locale = ctx.translation_locale(entry.lang.clone());
        for (draft, text) in targets(entry, main, background) {
            draft.push_translation(Translation {
                locale: locale.clone(),
                text,
            });
        }
    }

    for entry in ctx.head.transliterations_for(key) {
        for (draft, text) in targets(entry, main, background) {
            if draft.roman.is_none() {
                draft.roman = Some(text);
            }
        }
    }
}

fn targets<'d>(
    entry: &KeyedText,
    main: &'d mut LyricsDraft,
    background: &'d mut LyricsDraft,
) -> impl Iterator<Item = (&'d mut LyricsDraft, String)> {
    [
        entry.main.clone().map(|text| (main, text)),
        entry.background.clone().map(|text| (background, text)),
    ]
    .into_iter()
    .flatten()
}

fn min_time(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (time, None) | (None, time) => time,
    }
}

fn max_time(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (time, None) | (None, time) => time,
    }
}
