//! EPUB 3 导航文档解析
//!
//! `<nav epub:type="toc">` 下嵌套的 `ol/li` 列表转换为 TocEntry 树

use scraper::{ElementRef, Html, Selector};

use super::package::TocEntry;
use crate::domain::markup::expand_self_closing;

/// 解析导航文档中的目录
pub(crate) fn parse_nav(content: &str) -> Vec<TocEntry> {
    let document = Html::parse_document(&expand_self_closing(content));

    let Some(nav_selector) = Selector::parse("nav").ok() else {
        return Vec::new();
    };

    let navs: Vec<ElementRef<'_>> = document.select(&nav_selector).collect();
    let toc_nav = navs
        .iter()
        .find(|nav| {
            nav.value()
                .attr("epub:type")
                .is_some_and(|kind| kind.split_ascii_whitespace().any(|k| k == "toc"))
        })
        .or_else(|| navs.first());

    toc_nav
        .and_then(|nav| child_element(*nav, "ol"))
        .map(parse_list)
        .unwrap_or_default()
}

fn parse_list(list: ElementRef<'_>) -> Vec<TocEntry> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "li")
        .map(parse_item)
        .collect()
}

fn parse_item(item: ElementRef<'_>) -> TocEntry {
    let label = child_element(item, "a").or_else(|| child_element(item, "span"));

    TocEntry {
        title: label
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default(),
        href: label
            .and_then(|el| el.value().attr("href"))
            .map(str::to_string),
        children: child_element(item, "ol").map(parse_list).unwrap_or_default(),
    }
}

fn child_element<'a>(parent: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == name)
}
