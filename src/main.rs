//! # mdprotocol - 分子动力学协议启动器
//!
//! 读取 YAML 协议文件，按扩展名分发加载拓扑、坐标、速度、盒子
//! 向量和重启动检查点，校验后汇总为可供模拟引擎消费的输入容器。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (加载与汇总流程)
//!   │     ├── config/    (协议文件)
//!   │     ├── loaders/   (按扩展名分发)
//!   │     │     └── parsers/ (格式解析器)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod config;
mod error;
mod loaders;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
