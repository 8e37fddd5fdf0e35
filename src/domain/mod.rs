//! Domain Layer - 领域层
//!
//! 章节抽取引擎（纯同步，不做 I/O）:
//! - epub: 包读取器
//! - markup: 标记树能力接口
//! - title_resolver / content_segmenter / chapter_assembler: 抽取流程
//! - book: 书籍与章节的值对象和实体

pub mod book;
pub mod epub;
pub mod markup;

mod chapter_assembler;
mod content_segmenter;
mod title_resolver;

pub use chapter_assembler::{
    extract_chapter_titles, extract_titled_chapters, EmptyResultWarning, Extraction,
};
pub use content_segmenter::{segment_document, segment_tree, Segment};
pub use title_resolver::{resolve_titles, titles_from_documents, titles_from_headings, titles_from_toc};
