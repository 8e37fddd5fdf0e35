//! EPUB 结构文件解析 (container.xml, OPF, NCX)

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use super::error::UnreadablePackageError;
use super::package::TocEntry;

/// OPF manifest 条目（保持声明顺序）
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    pub properties: Vec<String>,
}

impl ManifestItem {
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p == name)
    }
}

/// 解析后的 OPF 数据
#[derive(Debug, Default)]
pub(crate) struct OpfData {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub manifest: Vec<ManifestItem>,
    pub spine: Vec<String>,
    /// spine 的 toc 属性（NCX 的 manifest id）
    pub toc_id: Option<String>,
}

impl OpfData {
    pub fn item(&self, id: &str) -> Option<&ManifestItem> {
        self.manifest.iter().find(|item| item.id == id)
    }
}

/// 解析 META-INF/container.xml，返回第一个 rootfile 的 full-path
pub(crate) fn parse_container_xml(bytes: &[u8]) -> Result<String, UnreadablePackageError> {
    const FILE: &str = "META-INF/container.xml";

    let content = std::str::from_utf8(strip_bom(bytes))
        .map_err(|e| UnreadablePackageError::malformed(FILE, e))?;

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if local_name(e.name().as_ref()) == b"rootfile" =>
            {
                if let Some(path) = attribute(&e, b"full-path").filter(|p| !p.is_empty()) {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(UnreadablePackageError::malformed(FILE, e)),
            _ => {}
        }
    }

    Err(UnreadablePackageError::MissingRootfile)
}

/// 解析 OPF 包文档
pub(crate) fn parse_opf(content: &str, file: &str) -> Result<OpfData, UnreadablePackageError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut data = OpfData::default();
    let mut saw_package = false;
    let mut in_metadata = false;
    let mut current: Option<&'static str> = None;
    let mut buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"package" => saw_package = true,
                    b"metadata" => in_metadata = true,
                    b"title" if in_metadata => {
                        current = Some("title");
                        buf.clear();
                    }
                    b"creator" if in_metadata => {
                        current = Some("creator");
                        buf.clear();
                    }
                    b"spine" => data.toc_id = attribute(&e, b"toc"),
                    _ => handle_opf_item(&e, &mut data),
                }
            }
            Ok(Event::Empty(e)) => {
                if local_name(e.name().as_ref()) == b"spine" {
                    data.toc_id = attribute(&e, b"toc");
                } else {
                    handle_opf_item(&e, &mut data);
                }
            }
            Ok(Event::Text(e)) => {
                if current.is_some() {
                    buf.push_str(&text_of(&e));
                }
            }
            Ok(Event::CData(e)) => {
                if current.is_some() {
                    buf.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if local == b"metadata" {
                    in_metadata = false;
                }
                match current.take() {
                    Some("title") if local == b"title" => {
                        let title = buf.trim();
                        if data.title.is_none() && !title.is_empty() {
                            data.title = Some(title.to_string());
                        }
                    }
                    Some("creator") if local == b"creator" => {
                        let author = buf.trim();
                        if !author.is_empty() {
                            data.authors.push(author.to_string());
                        }
                    }
                    other => current = other,
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(UnreadablePackageError::malformed(file, e)),
            _ => {}
        }
    }

    if !saw_package {
        return Err(UnreadablePackageError::malformed(file, "missing <package> element"));
    }

    Ok(data)
}

fn handle_opf_item(e: &BytesStart<'_>, data: &mut OpfData) {
    match local_name(e.name().as_ref()) {
        b"item" => {
            let id = attribute(e, b"id").unwrap_or_default();
            if id.is_empty() {
                return;
            }
            data.manifest.push(ManifestItem {
                id,
                href: attribute(e, b"href").unwrap_or_default(),
                media_type: attribute(e, b"media-type").unwrap_or_default(),
                properties: attribute(e, b"properties")
                    .map(|p| p.split_ascii_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
            });
        }
        b"itemref" => {
            if let Some(idref) = attribute(e, b"idref").filter(|id| !id.is_empty()) {
                data.spine.push(idref);
            }
        }
        _ => {}
    }
}

/// 解析 NCX 目录
///
/// navPoint 没有 navLabel 文本时保留空标题，由标题解析器跳过；子节点照常保留
pub(crate) fn parse_ncx(content: &str, file: &str) -> Result<Vec<TocEntry>, UnreadablePackageError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<NavPointState> = vec![NavPointState::new()];
    let mut in_label = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"navPoint" => stack.push(NavPointState::new()),
                b"navLabel" => in_label = true,
                b"text" => in_text = true,
                b"content" => set_nav_src(&e, &mut stack),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if local_name(e.name().as_ref()) == b"content" {
                    set_nav_src(&e, &mut stack);
                }
            }
            Ok(Event::Text(e)) => {
                // 只取 navPoint 自己的 navLabel（docTitle 也有 <text>）
                if in_label && in_text && stack.len() > 1 {
                    if let Some(state) = stack.last_mut() {
                        state.title.push_str(&text_of(&e));
                    }
                }
            }
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"navLabel" => in_label = false,
                b"text" => in_text = false,
                b"navPoint" => {
                    if stack.len() > 1 {
                        if let Some(state) = stack.pop() {
                            let entry = state.into_entry();
                            if let Some(parent) = stack.last_mut() {
                                parent.children.push(entry);
                            }
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(UnreadablePackageError::malformed(file, e)),
            _ => {}
        }
    }

    // 未闭合的 navPoint 逐层折叠回根节点
    while stack.len() > 1 {
        if let Some(state) = stack.pop() {
            let entry = state.into_entry();
            if let Some(parent) = stack.last_mut() {
                parent.children.push(entry);
            }
        }
    }

    Ok(stack.pop().map(|root| root.children).unwrap_or_default())
}

struct NavPointState {
    title: String,
    href: Option<String>,
    children: Vec<TocEntry>,
}

impl NavPointState {
    fn new() -> Self {
        Self {
            title: String::new(),
            href: None,
            children: Vec::new(),
        }
    }

    fn into_entry(self) -> TocEntry {
        TocEntry {
            title: self.title,
            href: self.href,
            children: self.children,
        }
    }
}

fn set_nav_src(e: &BytesStart<'_>, stack: &mut [NavPointState]) {
    if stack.len() < 2 {
        return;
    }
    if let (Some(state), Some(src)) = (stack.last_mut(), attribute(e, b"src")) {
        state.href = Some(src);
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// 去掉 UTF-8 BOM
pub(crate) fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}

/// 命名空间前缀剥离 ("dc:title" -> "title")
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(i) => name.get(i + 1..).unwrap_or(name),
        None => name,
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}

/// 文本节点反转义；未知实体（如 &nbsp;）保留原文
fn text_of(e: &BytesText<'_>) -> String {
    match e.unescape() {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(e.as_ref()).into_owned(),
    }
}
