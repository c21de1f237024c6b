//! # 工具函数模块
//!
//! 提供美化输出和文件命名工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `parsers/` 模块使用
//! - 子模块: output, naming

pub mod naming;
pub mod output;
