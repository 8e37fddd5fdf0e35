//! 标题解析器
//!
//! 两级策略：
//! 1. 目录优先：目录树先序遍历，输出裁剪后非空的标题
//! 2. 标题扫描回退：目录没有产生任何候选时，按包顺序扫描可渲染文档中的 h1–h3

use super::epub::{Package, TocEntry};
use super::markup::{HtmlTree, MarkupTree};

/// 目录优先：深度优先、先序遍历
///
/// 空白标题的条目本身被跳过，但其子节点照常遍历
pub fn titles_from_toc(toc: &[TocEntry]) -> Vec<String> {
    let mut titles = Vec::new();
    collect_toc_titles(toc, &mut titles);
    titles
}

fn collect_toc_titles(entries: &[TocEntry], titles: &mut Vec<String>) {
    for entry in entries {
        let title = entry.title.trim();
        if !title.is_empty() {
            titles.push(title.to_string());
        }
        collect_toc_titles(&entry.children, titles);
    }
}

/// 单个标记树中所有非空的 h1–h3 标题（文档顺序）
pub fn titles_from_headings(tree: &impl MarkupTree) -> Vec<String> {
    tree.headings()
        .into_iter()
        .filter_map(|heading| {
            let text = heading.text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect()
}

/// 回退：按包顺序扫描所有可渲染文档的标题
pub fn titles_from_documents(package: &Package) -> Vec<String> {
    package
        .renderable_documents()
        .flat_map(|doc| titles_from_headings(&HtmlTree::parse(doc.content())))
        .collect()
}

/// 解析整个包的标题候选：目录优先，为空时回退到标题扫描
///
/// 重复标题原样保留
pub fn resolve_titles(package: &Package) -> Vec<String> {
    let titles = titles_from_toc(package.toc());
    if !titles.is_empty() {
        return titles;
    }

    tracing::debug!(
        toc_entries = package.toc().len(),
        "TOC yielded no titles, falling back to heading scan"
    );
    titles_from_documents(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::epub::Document;

    fn xhtml(id: &str, body: &str) -> Document {
        Document::new(
            id,
            format!("OEBPS/{id}.xhtml"),
            "application/xhtml+xml",
            format!("<html><head><title>{id}</title></head><body>{body}</body></html>"),
        )
    }

    #[test]
    fn test_toc_preorder_with_trimming() {
        let toc = vec![
            TocEntry::new("  Preface "),
            TocEntry::new("Part One").with_children(vec![
                TocEntry::new("Chapter 1"),
                TocEntry::new("Chapter 2").with_children(vec![TocEntry::new("Section 2.1")]),
            ]),
            TocEntry::new("Epilogue"),
        ];

        assert_eq!(
            titles_from_toc(&toc),
            vec!["Preface", "Part One", "Chapter 1", "Chapter 2", "Section 2.1", "Epilogue"]
        );
    }

    #[test]
    fn test_blank_toc_entry_skipped_but_children_kept() {
        let toc = vec![
            TocEntry::new("   ").with_children(vec![TocEntry::new("Nested")]),
            TocEntry::new(""),
        ];

        assert_eq!(titles_from_toc(&toc), vec!["Nested"]);
    }

    #[test]
    fn test_internal_whitespace_preserved() {
        let toc = vec![TocEntry::new("\n Chapter   One \t")];
        assert_eq!(titles_from_toc(&toc), vec!["Chapter   One"]);
    }

    #[test]
    fn test_toc_wins_over_headings() {
        let package = Package::from_parts(
            vec![TocEntry::new("From TOC")],
            vec![xhtml("a", "<h1>From heading</h1>")],
        );

        assert_eq!(resolve_titles(&package), vec!["From TOC"]);
    }

    #[test]
    fn test_fallback_scans_documents_in_order() {
        let package = Package::from_parts(
            vec![TocEntry::new("  ")],
            vec![
                xhtml("a", "<h1>Intro</h1><p>x</p><h2>  </h2><h3>Details</h3>"),
                xhtml("b", "<h4>Too deep</h4><p>nothing</p>"),
                xhtml("c", "<h2>Intro</h2>"),
            ],
        );

        assert_eq!(resolve_titles(&package), vec!["Intro", "Details", "Intro"]);
    }

    #[test]
    fn test_fallback_ignores_non_renderable_documents() {
        let package = Package::from_parts(
            Vec::new(),
            vec![
                Document::new("css", "OEBPS/style.css", "text/css", "<h1>Not markup</h1>"),
                xhtml("a", "<h1>Real</h1>"),
            ],
        );

        assert_eq!(resolve_titles(&package), vec!["Real"]);
    }

    #[test]
    fn test_nothing_discoverable() {
        let package = Package::from_parts(Vec::new(), vec![xhtml("a", "<p>plain</p>")]);
        assert!(resolve_titles(&package).is_empty());
    }
}
