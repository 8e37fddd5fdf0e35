//! Storage Adapter - 上传文件存储

mod file_storage;

pub use file_storage::FileUploadStorage;
