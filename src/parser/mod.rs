//! # TTML (Timed Text Markup Language) 解析器
//!
//! 该解析器设计上仅用于解析 Apple Music 和 AMLL 使用的 TTML 歌词文件，
//! 不建议用于解析通用的 TTML 字幕文件。

mod body;
mod constants;
mod head;
mod utils;

use tracing::{info, warn};

use self::{
    body::{LineContext, build_line},
    constants::{ATTR_SONG_PART, TAG_BODY, TAG_P},
    head::read_head_annotations,
    utils::get_lang_attribute,
};
use crate::{
    config::ParsingOptions,
    error::LyricsError,
    markup::{Document, Element},
    model::{Line, LyricsDocument},
    processors::vowel::VowelAnalyzer,
};

/// 解析 TTML 格式的歌词文件。
///
/// # 参数
///
/// * `content` - TTML 格式的歌词文件内容字符串。
/// * `options` - 解析选项，包含声明的语言、默认翻译语言和长元音阈值。
///
/// # 返回
///
/// * `Ok(LyricsDocument)` - 按文档顺序排列的歌词行，每个 `<p>` 对应一行。
/// * `Err(LyricsError)` - 解析失败时，返回具体的错误信息。
///
/// # Errors
///
/// * `LyricsError::DocumentNotFound` - 输入中无法得到任何 XML 元素
/// * `LyricsError::BodyNotFound` - 文档中没有 `<body>`
/// * `LyricsError::EmptyResult` - `<body>` 中没有任何 `<p>`
///
/// 单个时间戳格式错误不会导致失败，只会记录警告并视为缺失。
pub fn parse_ttml(
    content: &str,
    options: &ParsingOptions,
) -> Result<LyricsDocument, LyricsError> {
    let document = Document::parse(content)?;
    let root = document.root();

    let body = if root.name() == TAG_BODY {
        root
    } else {
        root.find_descendant(TAG_BODY)
            .ok_or(LyricsError::BodyNotFound)?
    };

    let language = get_lang_attribute(root).or_else(|| options.declared_locale.clone());
    let head = read_head_annotations(root);
    let analyzer = VowelAnalyzer::from_options(options);
    let ctx = LineContext {
        options,
        analyzer: &analyzer,
        head: &head,
    };

    let mut lines = Vec::new();
    collect_lines(body, None, &ctx, &mut lines);

    if lines.is_empty() {
        warn!("TTML 中没有任何 <p> 歌词行");
        return Err(LyricsError::EmptyResult);
    }

    info!(
        "TTML 解析完成，共 {} 行，语言: {}",
        lines.len(),
        language.as_deref().unwrap_or("未知")
    );
    Ok(LyricsDocument::new(lines, language))
}

/// 按文档顺序收集 `<p>`。`<div>` 等容器上的 `itunes:song-part` 会被其中的行继承。
/// 不会进入 `<p>` 内部查找嵌套的 `<p>`。
fn collect_lines(
    container: &Element,
    song_part: Option<&str>,
    ctx: &LineContext<'_>,
    lines: &mut Vec<Line>,
) {
    for child in container.child_elements() {
        if child.name() == TAG_P {
            lines.push(build_line(child, song_part, lines.len(), ctx));
        } else {
            let part = child.attribute(ATTR_SONG_PART).or(song_part);
            collect_lines(child, part, ctx, lines);
        }
    }
}
