//! Book Context - Entities

use serde::{Deserialize, Serialize};

use super::{BookError, ChapterTitle};

/// 抽取结果中的章节
///
/// 不变量:
/// - order 从 1 开始
/// - 构造后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    title: ChapterTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    order: usize,
}

impl Chapter {
    pub fn new(
        order: usize,
        title: ChapterTitle,
        content: Option<String>,
    ) -> Result<Self, BookError> {
        if order == 0 {
            return Err(BookError::InvalidOrder(order));
        }
        Ok(Self {
            title,
            content,
            order,
        })
    }

    pub fn title(&self) -> &ChapterTitle {
        &self.title
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn order(&self) -> usize {
        self.order
    }
}
