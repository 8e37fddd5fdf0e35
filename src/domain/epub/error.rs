//! Package Reader - Errors

use thiserror::Error;

/// 无法读取的 EPUB 包
///
/// 整个提取调用的致命错误，原样返回给调用方
#[derive(Debug, Error)]
pub enum UnreadablePackageError {
    #[error("Not a valid EPUB archive: {0}")]
    Archive(String),

    #[error("Missing package entry: {0}")]
    MissingEntry(String),

    #[error("No rootfile declared in META-INF/container.xml")]
    MissingRootfile,

    #[error("Malformed {file}: {reason}")]
    Malformed { file: String, reason: String },

    #[error("IO error: {0}")]
    Io(String),
}

impl UnreadablePackageError {
    pub fn malformed(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for UnreadablePackageError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Self::Io(e.to_string()),
            other => Self::Archive(other.to_string()),
        }
    }
}

impl From<std::io::Error> for UnreadablePackageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
