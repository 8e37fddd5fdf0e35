//! Package Reader - EPUB 容器
//!
//! 打开时一次性读入所需的全部内容；Package 只读，drop 即释放全部资源

use percent_encoding::percent_decode_str;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

use super::error::UnreadablePackageError;
use super::nav::parse_nav;
use super::parser::{parse_container_xml, parse_ncx, parse_opf, strip_bom, ManifestItem, OpfData};

const CONTAINER_PATH: &str = "META-INF/container.xml";
const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// 可渲染的标记文档媒体类型
const RENDERABLE_MEDIA_TYPES: &[&str] = &["application/xhtml+xml", "text/html"];

/// 目录节点
///
/// 不变量: 标题可能为空（空标题条目由标题解析器跳过，但其子节点仍被遍历）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub href: Option<String>,
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TocEntry>) -> Self {
        self.children = children;
        self
    }
}

/// 包内的单个标记文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    href: String,
    media_type: String,
    content: String,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
            content: content.into(),
        }
    }

    /// 稳定标识（manifest id）
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 包内路径（相对于容器根目录）
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_renderable(&self) -> bool {
        is_renderable_media_type(&self.media_type)
    }
}

/// 包元数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
}

/// 已打开的 EPUB 包
#[derive(Debug, Clone, Default)]
pub struct Package {
    metadata: PackageMetadata,
    toc: Vec<TocEntry>,
    documents: Vec<Document>,
}

impl Package {
    /// 直接由目录和文档构建（不经过 ZIP 容器）
    pub fn from_parts(toc: Vec<TocEntry>, documents: Vec<Document>) -> Self {
        Self {
            metadata: PackageMetadata::default(),
            toc,
            documents,
        }
    }

    /// 从文件路径打开
    pub fn open(path: impl AsRef<Path>) -> Result<Self, UnreadablePackageError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    /// 从内存字节打开
    ///
    /// # 错误
    /// 不是 ZIP 容器、缺少 container.xml / OPF / spine 文档时返回 `UnreadablePackageError`
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, UnreadablePackageError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        let container = read_entry(&mut archive, CONTAINER_PATH)?;
        let opf_path = parse_container_xml(&container)?;
        let opf_bytes = read_entry(&mut archive, &opf_path)?;
        let opf = parse_opf(&decode_text(&opf_bytes), &opf_path)?;
        let base_dir = parent_dir(&opf_path);

        let mut documents = Vec::new();
        for item in document_items(&opf) {
            let href = resolve_href(base_dir, &item.href);
            let content = read_entry(&mut archive, &href)?;
            documents.push(Document {
                id: item.id.clone(),
                href,
                media_type: item.media_type.clone(),
                content: decode_text(&content),
            });
        }

        let toc = read_toc(&mut archive, &opf, base_dir);

        tracing::debug!(
            opf = %opf_path,
            documents = documents.len(),
            toc_entries = toc.len(),
            "EPUB package opened"
        );

        Ok(Self {
            metadata: PackageMetadata {
                title: opf.title,
                authors: opf.authors,
            },
            toc,
            documents,
        })
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    /// 声明的目录（可能为空）
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    /// 按包声明顺序排列的文档
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// 只返回可渲染的标记文档
    pub fn renderable_documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|doc| doc.is_renderable())
    }
}

pub fn is_renderable_media_type(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    RENDERABLE_MEDIA_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(essence))
}

/// 文档顺序：先 spine，再补上不在 spine 中的可渲染 manifest 条目
///
/// 导航文档不属于阅读内容，除非 spine 显式引用了它
fn document_items(opf: &OpfData) -> Vec<&ManifestItem> {
    let mut items: Vec<&ManifestItem> = Vec::new();

    for idref in &opf.spine {
        match opf.item(idref) {
            Some(item) if !items.iter().any(|seen| seen.id == item.id) => items.push(item),
            Some(_) => {}
            None => tracing::warn!(idref = %idref, "Spine references unknown manifest item"),
        }
    }

    for item in &opf.manifest {
        if is_renderable_media_type(&item.media_type)
            && !item.has_property("nav")
            && !items.iter().any(|seen| seen.id == item.id)
        {
            items.push(item);
        }
    }

    items
}

/// 读取目录：优先 NCX，为空时回退到 EPUB 3 导航文档
///
/// 目录是可选结构，解析失败只记录警告
fn read_toc(archive: &mut ZipArchive<Cursor<Vec<u8>>>, opf: &OpfData, base_dir: &str) -> Vec<TocEntry> {
    let ncx_item = opf
        .toc_id
        .as_deref()
        .and_then(|id| opf.item(id))
        .or_else(|| opf.manifest.iter().find(|item| item.media_type == NCX_MEDIA_TYPE));

    if let Some(item) = ncx_item {
        let href = resolve_href(base_dir, &item.href);
        match read_entry(archive, &href).and_then(|bytes| parse_ncx(&decode_text(&bytes), &href)) {
            Ok(toc) if !toc.is_empty() => return toc,
            Ok(_) => {}
            Err(e) => tracing::warn!(ncx = %href, error = %e, "Ignoring unreadable NCX table of contents"),
        }
    }

    if let Some(item) = opf.manifest.iter().find(|item| item.has_property("nav")) {
        let href = resolve_href(base_dir, &item.href);
        match read_entry(archive, &href) {
            Ok(bytes) => return parse_nav(&decode_text(&bytes)),
            Err(e) => tracing::warn!(nav = %href, error = %e, "Ignoring unreadable navigation document"),
        }
    }

    Vec::new()
}

fn read_entry(
    archive: &mut ZipArchive<Cursor<Vec<u8>>>,
    name: &str,
) -> Result<Vec<u8>, UnreadablePackageError> {
    let mut file = archive.by_name(name).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => UnreadablePackageError::MissingEntry(name.to_string()),
        other => other.into(),
    })?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// UTF-8 解码（去 BOM，非法序列替换）
fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(strip_bom(bytes)).into_owned()
}

fn parent_dir(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..i])
}

/// 将 OPF 中的相对 href 解析为容器内路径
///
/// 去掉片段标识、百分号解码、规整 `.` 与 `..`
pub(crate) fn resolve_href(base_dir: &str, href: &str) -> String {
    let without_fragment = href.split('#').next().unwrap_or_default();
    let decoded = percent_decode_str(without_fragment).decode_utf8_lossy();

    let mut segments: Vec<&str> = if decoded.starts_with('/') {
        Vec::new()
    } else {
        base_dir.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}
