//! 内容分段器
//!
//! 每个可渲染文档产生至多一个 (标题, 正文)：
//! 第一个非空 h1–h3 作为标题并从树中移除，剩余可见文本作为正文。
//! 后续标题保留在正文中，不产生新的章节边界

use super::epub::Document;
use super::markup::{HtmlTree, MarkupTree};

/// 单个文档的分段结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub title: String,
    pub body: String,
}

/// 对标记树分段
///
/// 没有非空标题时使用 `fallback_title`；正文为空时返回 None
pub fn segment_tree(tree: &mut impl MarkupTree, fallback_title: &str) -> Option<Segment> {
    let consumed = tree
        .headings()
        .into_iter()
        .enumerate()
        .find_map(|(position, heading)| {
            let text = heading.text.trim();
            (!text.is_empty()).then(|| (position, text.to_string()))
        });

    let title = match consumed {
        Some((position, text)) => {
            tree.remove_heading(position);
            text
        }
        None => fallback_title.to_string(),
    };

    let body = tree.visible_text();
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    Some(Segment {
        title,
        body: body.to_string(),
    })
}

/// 对单个文档分段；不可渲染的文档返回 None
pub fn segment_document(document: &Document) -> Option<Segment> {
    if !document.is_renderable() {
        return None;
    }

    let mut tree = HtmlTree::parse(document.content());
    let segment = segment_tree(&mut tree, document.id());
    if segment.is_none() {
        tracing::debug!(document = %document.id(), "Document has no body text, skipped");
    }
    segment
}
