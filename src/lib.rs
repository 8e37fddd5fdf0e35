//! Folio - EPUB 章节切分服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - EPUB: 包读取（container / OPF / NCX / nav）
//! - Markup: XHTML 标题与可见文本
//! - 章节抽取: 标题解析、正文切分、章节组装
//! - Book Context: 章节值对象与实体
//!
//! 应用层 (application/):
//! - Ports: 端口定义（BookRepository, UploadStorage, Summarizer）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: SQLite 存储
//! - Adapters: 上传文件存储, 摘要客户端

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
