//! Package Reader - EPUB 包读取
//!
//! 职责:
//! - 打开 EPUB 容器（ZIP）并解析 container.xml / OPF
//! - 按 spine 顺序提供标记文档
//! - 提供目录（NCX 优先，EPUB 3 导航文档兜底）

mod error;
mod nav;
mod package;
mod parser;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::UnreadablePackageError;
pub use package::{is_renderable_media_type, Document, Package, PackageMetadata, TocEntry};
