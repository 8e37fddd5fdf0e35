//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的章节顺序: {0}")]
    InvalidOrder(usize),
}
