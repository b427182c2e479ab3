//! # 标记树遍历
//!
//! 基于 `quick-xml` 事件构建一个极简的元素树，并提供按文档顺序遍历子节点、
//! 以及“保留空白”的文本提取。
//!
//! 直接拼接文本节点会丢失单词之间的空格信息，`preserved_text` 会在原文本节点
//! 以空白结尾（或开头）的位置补回一个空格，换行缩进同样算作一个空格，
//! 供后续的空格重建使用。

use quick_xml::{
    Reader,
    errors::Error as QuickXmlError,
    events::{BytesStart, Event},
};
use tracing::{debug, warn};

use crate::error::LyricsError;

/// 元素的一个子节点。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// 文本片段（实体引用已解码，相邻片段已合并）。
    Text(String),
    /// 子元素。
    Element(Element),
}

/// 一个 XML 元素。名称为去掉命名空间前缀后的本地名，属性保留完整的限定名。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按文档顺序返回所有子节点。
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// 返回给定属性名列表中第一个存在的属性值。
    #[must_use]
    pub fn attribute(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| {
            self.attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        })
    }

    /// 先序查找第一个本地名为 `name` 的后代元素（不含自身）。
    #[must_use]
    pub fn find_descendant(&self, name: &str) -> Option<&Self> {
        self.child_elements().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.find_descendant(name)
            }
        })
    }

    /// 按文档顺序收集所有本地名为 `name` 的后代元素（不含自身）。
    #[must_use]
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a Self> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Self>) {
        for child in self.child_elements() {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    /// 递归拼接所有后代文本，并补回被折叠的空格。
    #[must_use]
    pub fn preserved_text(&self) -> String {
        self.preserved_text_where(|_| true)
    }

    /// 与 [`Element::preserved_text`] 相同，但跳过 `keep` 返回 `false` 的子元素。
    #[must_use]
    pub fn preserved_text_where(&self, keep: impl Fn(&Self) -> bool) -> String {
        let mut output = String::new();
        self.write_preserved_text(&keep, &mut output);
        output
    }

    fn write_preserved_text(&self, keep: &impl Fn(&Self) -> bool, output: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(run) => push_text_run(run, output),
                Node::Element(child) if keep(child) => child.write_preserved_text(keep, output),
                Node::Element(_) => {}
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_owned()));
        }
    }
}

/// 把一个文本片段按空白规则写入输出：
/// 纯空白片段（含换行缩进）算作一个空格；有内容的片段两端如有空白，各补一个空格。
///
/// 输出开头以及已经以空白结尾时不再补空格，因此被跳过的子元素两侧的空白
/// 只留下一个空格。
fn push_text_run(run: &str, output: &mut String) {
    let trimmed = run.trim();
    if trimmed.is_empty() {
        if !run.is_empty() {
            push_separator(output);
        }
        return;
    }
    if run.starts_with(char::is_whitespace) {
        push_separator(output);
    }
    output.push_str(trimmed);
    if run.ends_with(char::is_whitespace) {
        push_separator(output);
    }
}

fn push_separator(output: &mut String) {
    if !output.is_empty() && !output.ends_with(char::is_whitespace) {
        output.push(' ');
    }
}

/// 解析后的标记文档。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// 从原始文本构建元素树。
    ///
    /// 对结束标签不匹配等局部错误会尽量恢复；只有在完全无法得到根元素时才返回
    /// [`LyricsError::DocumentNotFound`]。
    pub fn parse(raw: &str) -> Result<Self, LyricsError> {
        let mut reader = Reader::from_str(raw);
        reader.config_mut().trim_text(false);
        reader.config_mut().expand_empty_elements = true;
        reader.config_mut().check_end_names = false;

        let mut builder = TreeBuilder::default();

        loop {
            let position_before = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => builder.open(element_from_start(&e, &reader)),
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    builder.close(&name);
                }
                Ok(Event::Text(e)) => match e.xml_content() {
                    Ok(text) => builder.text(&text),
                    Err(err) => warn!("无法解码文本节点，位置 {}: {err}", reader.buffer_position()),
                },
                Ok(Event::CData(e)) => builder.text(&String::from_utf8_lossy(&e)),
                Ok(Event::GeneralRef(e)) => {
                    let entity_name = String::from_utf8_lossy(e.as_ref());
                    if let Some(decoded) = decode_entity(&entity_name) {
                        let mut buf = [0u8; 4];
                        builder.text(decoded.encode_utf8(&mut buf));
                    }
                }
                Ok(_) => {}
                Err(QuickXmlError::IllFormed(e)) => {
                    warn!(
                        "TTML 格式错误，位置 {}: {e}。尝试继续解析",
                        reader.error_position()
                    );
                    if reader.buffer_position() == position_before {
                        break;
                    }
                }
                Err(e) => {
                    if builder.has_started() {
                        warn!(
                            "TTML 解析错误，位置 {}: {e}。保留已解析的部分",
                            reader.error_position()
                        );
                        break;
                    }
                    return Err(LyricsError::DocumentNotFound(e.to_string()));
                }
            }
        }

        builder
            .finish()
            .map(|root| Self { root })
            .ok_or_else(|| LyricsError::DocumentNotFound("输入中没有任何 XML 元素".to_string()))
    }

    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    stack: Vec<Element>,
    root: Option<Element>,
}

impl TreeBuilder {
    fn has_started(&self) -> bool {
        !self.stack.is_empty() || self.root.is_some()
    }

    fn open(&mut self, element: Element) {
        if self.stack.is_empty() && self.root.is_some() {
            debug!("忽略根元素之后的元素 <{}>", element.name);
        }
        self.stack.push(element);
    }

    fn close(&mut self, name: &str) {
        let Some(depth) = self.stack.iter().rposition(|e| e.name == name) else {
            warn!("忽略了没有对应开始标签的 </{name}>");
            return;
        };
        while self.stack.len() > depth + 1 {
            if let Some(unclosed) = self.stack.last() {
                warn!("<{}> 没有结束标签，在 </{name}> 处隐式关闭", unclosed.name);
            }
            self.pop();
        }
        self.pop();
    }

    fn pop(&mut self) {
        let Some(element) = self.stack.pop() else {
            return;
        };
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Node::Element(element));
        } else if self.root.is_none() {
            self.root = Some(element);
        }
    }

    fn text(&mut self, text: &str) {
        // 根元素之外的文本（通常是换行）没有意义
        if let Some(current) = self.stack.last_mut() {
            current.push_text(text);
        }
    }

    fn finish(mut self) -> Option<Element> {
        if !self.stack.is_empty() {
            warn!("文档在 {} 个元素未关闭时结束", self.stack.len());
        }
        while !self.stack.is_empty() {
            self.pop();
        }
        self.root
    }
}

fn element_from_start(e: &BytesStart, reader: &Reader<&[u8]>) -> Element {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let attributes = e
        .attributes()
        .filter_map(|attr| match attr {
            Ok(attr) => {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                match attr.decode_and_unescape_value(reader.decoder()) {
                    Ok(value) => Some((key, value.into_owned())),
                    Err(err) => {
                        warn!("<{name}> 的属性 '{key}' 无法解码: {err}");
                        None
                    }
                }
            }
            Err(err) => {
                warn!("<{name}> 中存在无效属性: {err}");
                None
            }
        })
        .collect();

    Element {
        name,
        attributes,
        children: Vec::new(),
    }
}

/// 解码 XML 实体引用名（不含 `&` 和 `;`）。
fn decode_entity(entity_name: &str) -> Option<char> {
    if let Some(num_str) = entity_name.strip_prefix('#') {
        let (radix, code_point_str) = num_str
            .strip_prefix('x')
            .map_or((10, num_str), |stripped| (16, stripped));

        let decoded = u32::from_str_radix(code_point_str, radix)
            .ok()
            .and_then(char::from_u32);
        if decoded.is_none() {
            warn!("无法解析无效的XML数字实体 '&{entity_name};'");
        }
        return decoded;
    }

    match entity_name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            warn!("忽略了未知的XML实体 '&{entity_name};'");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_root(raw: &str) -> Element {
        Document::parse(raw).unwrap().root().clone()
    }

    #[test]
    fn test_children_in_document_order() {
        let root = parse_root(r#"<p>Hi <span begin="1">there</span>!</p>"#);

        assert_eq!(root.name(), "p");
        let kinds: Vec<&str> = root
            .children()
            .iter()
            .map(|node| match node {
                Node::Text(_) => "text",
                Node::Element(_) => "element",
            })
            .collect();
        assert_eq!(kinds, ["text", "element", "text"]);
        let span = root.child_elements().next().unwrap();
        assert_eq!(span.attribute(&["begin"]), Some("1"));
    }

    #[test]
    fn test_local_names_and_qualified_attributes() {
        let root = parse_root(
            r#"<tt:tt xmlns:tt="http://www.w3.org/ns/ttml"><tt:body><tt:p ttm:agent="v2"/></tt:body></tt:tt>"#,
        );

        assert_eq!(root.name(), "tt");
        let p = root.find_descendant("p").unwrap();
        assert_eq!(p.attribute(&["ttm:agent", "agent"]), Some("v2"));
        assert_eq!(p.attribute(&["agent"]), None);
    }

    #[test]
    fn test_entities_are_merged_into_one_run() {
        let root = parse_root("<p>Rock &amp; roll &#x263A;</p>");
        assert_eq!(root.children(), [Node::Text("Rock & roll ☺".to_string())]);
    }

    #[test]
    fn test_preserved_text_keeps_inter_word_spaces() {
        let root = parse_root(
            "<p><span>Hey</span> <span>you </span><span>there</span><span>!</span></p>",
        );
        assert_eq!(root.preserved_text(), "Hey you there!");
    }

    #[test]
    fn test_preserved_text_where_skips_rejected_elements() {
        let root = parse_root(
            r#"<p><span>one</span> <span role="x-translation">uno</span><span>two</span></p>"#,
        );
        let text = root.preserved_text_where(|e| e.attribute(&["role"]).is_none());
        assert_eq!(text, "one two");
    }

    #[test]
    fn test_skipped_element_leaves_a_single_space() {
        let root =
            parse_root(r#"<p><span>a</span> <span role="x-bg">x</span> <span>b</span></p>"#);
        let text = root.preserved_text_where(|e| e.attribute(&["role"]).is_none());
        assert_eq!(text, "a b");
    }

    #[test]
    fn test_newline_between_spans_is_a_space() {
        let root = parse_root(
            "<p>\n    <span>Hey</span>\n    <span>you</span>\n    <span>there</span>\n</p>",
        );
        assert_eq!(root.preserved_text().trim(), "Hey you there");

        let root = parse_root("<p><span>Hey</span>\n<span>you</span></p>");
        assert_eq!(root.preserved_text(), "Hey you");
    }

    #[test]
    fn test_descendants_in_document_order() {
        let root = parse_root("<body><div><p>1</p><p>2</p></div><div><p>3</p></div></body>");
        let texts: Vec<String> = root
            .descendants("p")
            .iter()
            .map(|p| p.preserved_text())
            .collect();
        assert_eq!(texts, ["1", "2", "3"]);
    }

    #[test]
    fn test_recovers_from_mismatched_end_tag() {
        let root = parse_root("<body><p><span>a</p><p>b</p></body>");
        let ps = root.descendants("p");
        assert_eq!(ps.len(), 2);
        assert_eq!(ps[0].preserved_text(), "a");
        assert_eq!(ps[1].preserved_text(), "b");
    }

    #[test]
    fn test_unclosed_document_keeps_partial_tree() {
        let root = parse_root("<tt><body><p>a</p><p>b");
        assert_eq!(root.descendants("p").len(), 2);
    }

    #[test]
    fn test_no_element_is_document_not_found() {
        assert!(matches!(
            Document::parse("just some words"),
            Err(LyricsError::DocumentNotFound(_))
        ));
        assert!(matches!(
            Document::parse(""),
            Err(LyricsError::DocumentNotFound(_))
        ));
    }
}
