//! 章节组装器
//!
//! 两个独立入口共享标题解析器与内容分段器：
//! - `extract_chapter_titles`：仅标题（目录优先，标题扫描回退）
//! - `extract_titled_chapters`：标题 + 正文（按文档顺序逐个分段）
//!
//! 输出以顺序为键，同名章节作为不同章节保留

use super::book::{Chapter, ChapterTitle};
use super::content_segmenter::segment_document;
use super::epub::Package;
use super::title_resolver::resolve_titles;

/// 抽取完成但没有任何章节（非致命）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyResultWarning;

impl std::fmt::Display for EmptyResultWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no chapters found in package")
    }
}

/// 一次抽取的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    chapters: Vec<Chapter>,
}

impl Extraction {
    /// 按 1 起始的位置编号；序号取自已接受的章节数，被拒绝的条目不留空位
    fn number<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (ChapterTitle, Option<String>)>,
    {
        let mut chapters: Vec<Chapter> = Vec::new();
        for (title, content) in items {
            match Chapter::new(chapters.len() + 1, title, content) {
                Ok(chapter) => chapters.push(chapter),
                Err(e) => tracing::warn!(error = %e, "Chapter rejected"),
            }
        }
        Self { chapters }
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn into_chapters(self) -> Vec<Chapter> {
        self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn warning(&self) -> Option<EmptyResultWarning> {
        self.is_empty().then_some(EmptyResultWarning)
    }

    fn log_if_empty(self, mode: &'static str) -> Self {
        if self.is_empty() {
            tracing::warn!(mode, "{}", EmptyResultWarning);
        }
        self
    }
}

/// 仅标题模式
pub fn extract_chapter_titles(package: &Package) -> Extraction {
    let titles = resolve_titles(package)
        .into_iter()
        .filter_map(|title| ChapterTitle::new(title).ok())
        .map(|title| (title, None));

    Extraction::number(titles).log_if_empty("titles")
}

/// 标题 + 正文模式，顺序跟随文档顺序而非目录顺序
pub fn extract_titled_chapters(package: &Package) -> Extraction {
    let segments = package
        .renderable_documents()
        .filter_map(segment_document)
        .filter_map(|segment| {
            ChapterTitle::new(segment.title)
                .ok()
                .map(|title| (title, Some(segment.body)))
        });

    Extraction::number(segments).log_if_empty("titled")
}
