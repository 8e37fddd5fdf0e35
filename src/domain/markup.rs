//! 标记树能力接口
//!
//! 引擎只依赖这三个查询：列出标题、删除标题节点、提取可见文本；
//! 具体的 HTML 解析器隐藏在 `HtmlTree` 之后

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use scraper::{ElementRef, Html, Node, Selector};
use std::borrow::Cow;

/// 参与章节边界判断的标题级别 (h1–h3)
const HEADING_SELECTOR: &str = "h1, h2, h3";

/// 不可见内容
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "head", "template", "noscript", "title"];

/// 块级元素：起新行
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// HTML 空元素：`<x/>` 写法对 HTML 解析器本身有效
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// 文档中的标题元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 级别 1–3
    pub level: u8,
    /// 标题元素的完整文本（未裁剪）
    pub text: String,
}

/// 标记树能力接口
pub trait MarkupTree {
    /// 按文档顺序返回 h1–h3 标题
    fn headings(&self) -> Vec<Heading>;

    /// 删除 `headings()` 中第 `position` 个标题节点（连同其子树）
    ///
    /// 返回是否删除成功
    fn remove_heading(&mut self, position: usize) -> bool;

    /// 剩余树的可见文本（已裁剪首尾空白）
    fn visible_text(&self) -> String;
}

/// 基于 scraper (html5ever) 的实现
pub struct HtmlTree {
    document: Html,
    heading_selector: Option<Selector>,
    body_selector: Option<Selector>,
}

impl HtmlTree {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(&expand_self_closing(markup)),
            heading_selector: Selector::parse(HEADING_SELECTOR).ok(),
            body_selector: Selector::parse("body").ok(),
        }
    }

    /// 内容根节点：`<body>`，没有时退回整个文档
    fn content_root(&self) -> ElementRef<'_> {
        self.body_selector
            .as_ref()
            .and_then(|selector| self.document.select(selector).next())
            .unwrap_or_else(|| self.document.root_element())
    }
}

impl MarkupTree for HtmlTree {
    fn headings(&self) -> Vec<Heading> {
        let Some(selector) = self.heading_selector.as_ref() else {
            return Vec::new();
        };

        self.content_root()
            .select(selector)
            .map(|el| Heading {
                level: heading_level(el.value().name()),
                text: el.text().collect(),
            })
            .collect()
    }

    fn remove_heading(&mut self, position: usize) -> bool {
        let target = self
            .heading_selector
            .as_ref()
            .and_then(|selector| self.content_root().select(selector).nth(position))
            .map(|el| el.id());

        match target.and_then(|id| self.document.tree.get_mut(id)) {
            Some(mut node) => {
                node.detach();
                true
            }
            None => false,
        }
    }

    fn visible_text(&self) -> String {
        let mut raw = String::new();

        for node in self.content_root().descendants() {
            match node.value() {
                Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => raw.push('\n'),
                Node::Text(text) => {
                    let hidden = node.ancestors().any(|ancestor| {
                        ancestor
                            .value()
                            .as_element()
                            .is_some_and(|el| INVISIBLE_ELEMENTS.contains(&el.name()))
                    });
                    if !hidden {
                        push_collapsed(&mut raw, text);
                    }
                }
                _ => {}
            }
        }

        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 把 XHTML 中自闭合的非空元素（`<title/>`、`<script src="a.js"/>`）展开为
/// 开始/结束标签对
///
/// HTML5 解析器忽略非空元素上的 `/>`，`<title/>` 之后的整个文档都会变成
/// 原始文本。不是良构 XML 的输入原样返回。
pub(crate) fn expand_self_closing(markup: &str) -> Cow<'_, str> {
    if !markup.contains("/>") {
        return Cow::Borrowed(markup);
    }

    match rewrite_empty_elements(markup) {
        Some(expanded) => Cow::Owned(expanded),
        None => {
            tracing::debug!("Markup is not well-formed XML, parsing as HTML");
            Cow::Borrowed(markup)
        }
    }
}

fn rewrite_empty_elements(markup: &str) -> Option<String> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Vec::with_capacity(markup.len()));

    loop {
        match reader.read_event().ok()? {
            Event::Eof => break,
            Event::Empty(element) if !is_void_element(element.local_name().as_ref()) => {
                let end = element.to_end().into_owned();
                writer.write_event(Event::Start(element)).ok()?;
                writer.write_event(Event::End(end)).ok()?;
            }
            event => writer.write_event(event).ok()?,
        }
    }

    String::from_utf8(writer.into_inner()).ok()
}

fn is_void_element(name: &[u8]) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.as_bytes().eq_ignore_ascii_case(name))
}

fn heading_level(name: &str) -> u8 {
    match name {
        "h1" => 1,
        "h2" => 2,
        _ => 3,
    }
}

/// 追加文本，空白序列折叠为单个空格
fn push_collapsed(out: &mut String, text: &str) {
    let mut last_was_space = out.ends_with(char::is_whitespace);
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
}
