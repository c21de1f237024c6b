//! # 统一错误处理模块
//!
//! 定义 mdprotocol 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// mdprotocol 统一错误类型
#[derive(Error, Debug)]
pub enum MdProtocolError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 格式分发错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown loader for format '{extension}': {path}")]
    UnsupportedFormat { extension: String, path: String },

    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 容器校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Unusable instance: {0}")]
    UnusableInstance(String),

    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse protocol file: {path}\nReason: {reason}")]
    ConfigError { path: String, reason: String },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MdProtocolError>;
