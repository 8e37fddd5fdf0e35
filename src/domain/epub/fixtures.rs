//! 测试用 EPUB 构建器（内存中生成 ZIP，无需二进制样本文件）

#![allow(clippy::unwrap_used)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

enum Toc {
    None,
    Ncx(Vec<(String, Vec<String>)>),
    RawNcx(String),
    Nav(Vec<String>),
}

pub(crate) struct EpubBuilder {
    title: Option<String>,
    authors: Vec<String>,
    toc: Toc,
    documents: Vec<(String, String)>,
    raw_documents: Vec<(String, String)>,
    dangling: Vec<(String, String)>,
    spine: Option<Vec<String>>,
    with_container: bool,
}

impl EpubBuilder {
    pub fn new() -> Self {
        Self {
            title: None,
            authors: Vec::new(),
            toc: Toc::None,
            documents: Vec::new(),
            raw_documents: Vec::new(),
            dangling: Vec::new(),
            spine: None,
            with_container: true,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.authors.push(author.to_string());
        self
    }

    /// 两层 NCX：(顶层标题, 子标题列表)
    pub fn ncx(mut self, entries: &[(&str, &[&str])]) -> Self {
        self.toc = Toc::Ncx(
            entries
                .iter()
                .map(|(title, children)| {
                    (
                        title.to_string(),
                        children.iter().map(|c| c.to_string()).collect(),
                    )
                })
                .collect(),
        );
        self
    }

    pub fn raw_ncx(mut self, ncx: &str) -> Self {
        self.toc = Toc::RawNcx(ncx.to_string());
        self
    }

    pub fn nav(mut self, titles: &[&str]) -> Self {
        self.toc = Toc::Nav(titles.iter().map(|t| t.to_string()).collect());
        self
    }

    /// 添加 XHTML 文档，body 为 `<body>` 内部的标记
    pub fn document(mut self, id: &str, body: &str) -> Self {
        self.documents.push((id.to_string(), body.to_string()));
        self
    }

    /// 添加完整的 XHTML 文档（含 XML 声明和 head）
    pub fn raw_document(mut self, id: &str, markup: &str) -> Self {
        self.raw_documents.push((id.to_string(), markup.to_string()));
        self
    }

    /// manifest 中声明但容器中不存在的文档
    pub fn dangling_item(mut self, id: &str, href: &str) -> Self {
        self.dangling.push((id.to_string(), href.to_string()));
        self
    }

    pub fn spine(mut self, ids: &[&str]) -> Self {
        self.spine = Some(ids.iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn without_container(mut self) -> Self {
        self.with_container = false;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("mimetype", stored).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();

        if self.with_container {
            zip.start_file("META-INF/container.xml", deflated).unwrap();
            zip.write_all(CONTAINER_XML.as_bytes()).unwrap();
        }

        zip.start_file("OEBPS/content.opf", deflated).unwrap();
        zip.write_all(self.opf().as_bytes()).unwrap();

        match &self.toc {
            Toc::Ncx(entries) => {
                zip.start_file("OEBPS/toc.ncx", deflated).unwrap();
                zip.write_all(ncx_xml(entries).as_bytes()).unwrap();
            }
            Toc::RawNcx(raw) => {
                zip.start_file("OEBPS/toc.ncx", deflated).unwrap();
                zip.write_all(raw.as_bytes()).unwrap();
            }
            Toc::Nav(titles) => {
                zip.start_file("OEBPS/nav.xhtml", deflated).unwrap();
                zip.write_all(nav_xhtml(titles).as_bytes()).unwrap();
            }
            Toc::None => {}
        }

        for (id, body) in &self.documents {
            zip.start_file(format!("OEBPS/{id}.xhtml"), deflated).unwrap();
            zip.write_all(xhtml(id, body).as_bytes()).unwrap();
        }

        for (id, markup) in &self.raw_documents {
            zip.start_file(format!("OEBPS/{id}.xhtml"), deflated).unwrap();
            zip.write_all(markup.as_bytes()).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }

    fn opf(&self) -> String {
        let mut metadata = String::new();
        if let Some(title) = &self.title {
            metadata.push_str(&format!("<dc:title>{}</dc:title>", escape(title)));
        }
        for author in &self.authors {
            metadata.push_str(&format!("<dc:creator>{}</dc:creator>", escape(author)));
        }

        let mut manifest = String::new();
        let mut spine_attr = "";
        match self.toc {
            Toc::Ncx(_) | Toc::RawNcx(_) => {
                manifest.push_str(
                    r#"<item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>"#,
                );
                spine_attr = r#" toc="ncx""#;
            }
            Toc::Nav(_) => manifest.push_str(
                r#"<item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>"#,
            ),
            Toc::None => {}
        }
        for (id, _) in self.documents.iter().chain(&self.raw_documents) {
            manifest.push_str(&format!(
                r#"<item id="{id}" href="{id}.xhtml" media-type="application/xhtml+xml"/>"#
            ));
        }
        for (id, href) in &self.dangling {
            manifest.push_str(&format!(
                r#"<item id="{id}" href="{href}" media-type="application/xhtml+xml"/>"#
            ));
        }
        manifest.push_str(r#"<item id="css" href="style.css" media-type="text/css"/>"#);

        let spine_ids: Vec<String> = self
            .spine
            .clone()
            .unwrap_or_else(|| {
                self.documents
                    .iter()
                    .chain(&self.raw_documents)
                    .map(|(id, _)| id.clone())
                    .collect()
            });
        let spine: String = spine_ids
            .iter()
            .map(|id| format!(r#"<itemref idref="{id}"/>"#))
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">{metadata}</metadata>
  <manifest>{manifest}</manifest>
  <spine{spine_attr}>{spine}</spine>
</package>"#
        )
    }
}

const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

fn xhtml(id: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{id}</title><link rel="stylesheet" type="text/css" href="style.css"/><script type="text/javascript" src="book.js"/></head>
<body>{body}</body>
</html>"#
    )
}

fn ncx_xml(entries: &[(String, Vec<String>)]) -> String {
    let mut points = String::new();
    for (i, (title, children)) in entries.iter().enumerate() {
        points.push_str(&format!(
            r#"<navPoint id="np{i}"><navLabel><text>{}</text></navLabel><content src="ch{i}.xhtml"/>"#,
            escape(title)
        ));
        for (j, child) in children.iter().enumerate() {
            points.push_str(&format!(
                r#"<navPoint id="np{i}-{j}"><navLabel><text>{}</text></navLabel><content src="ch{i}.xhtml#s{j}"/></navPoint>"#,
                escape(child)
            ));
        }
        points.push_str("</navPoint>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <docTitle><text>Book Title</text></docTitle>
  <navMap>{points}</navMap>
</ncx>"#
    )
}

fn nav_xhtml(titles: &[String]) -> String {
    let items: String = titles
        .iter()
        .enumerate()
        .map(|(i, title)| format!(r#"<li><a href="ch{i}.xhtml">{}</a></li>"#, escape(title)))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title/><link rel="stylesheet" type="text/css" href="style.css"/></head>
<body><nav epub:type="toc"><ol>{items}</ol></nav></body>
</html>"#
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
