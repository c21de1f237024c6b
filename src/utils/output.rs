//! # 终端输出工具
//!
//! 加载流程的统一终端样式：每个输入文件一行状态，末尾一行总结。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `loaders/` 使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 输入文件加载成功
pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg);
}

/// 致命错误 (写到 stderr)
pub fn print_error(msg: &str) {
    eprintln!("  {} {}", "✗".red().bold(), msg);
}

/// 非致命提示
pub fn print_warning(msg: &str) {
    println!("  {} {}", "!".yellow().bold(), msg);
}

/// 过程信息
pub fn print_info(msg: &str) {
    println!("  {} {}", "·".cyan(), msg);
}

/// 全部加载完成
pub fn print_done(msg: &str) {
    println!("\n{} {}", "done:".green().bold(), msg);
}

/// 标题栏
pub fn print_header(title: &str) {
    println!("\n{}", title.bold());
    println!("{}\n", "─".repeat(title.chars().count().max(24)).dimmed());
}
