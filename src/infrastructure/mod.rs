//! Infrastructure Layer - 基础设施层
//!
//! - adapters: 上传文件存储、摘要客户端
//! - http: axum 路由与处理器
//! - persistence: SQLite 书籍/章节仓储

pub mod adapters;
pub mod http;
pub mod persistence;
