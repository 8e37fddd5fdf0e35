//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - 章节标题值对象（裁剪后非空）
//! - 抽取结果中的章节实体（1 起始、连续的顺序号）

mod entities;
mod errors;
mod value_objects;

pub use entities::Chapter;
pub use errors::BookError;
pub use value_objects::{BookId, ChapterId, ChapterTitle};
