//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数：一个位置参数 (YAML 协议文件) 加
//! 可选的硬件平台与数值精度选择。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 参数传递给 `commands/mod.rs`

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// mdprotocol - 分子动力学协议启动器
#[derive(Parser)]
#[command(name = "mdprotocol")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Easy to deploy MD protocols: load and validate simulation inputs", long_about = None)]
pub struct Cli {
    /// YAML protocol file describing the input files
    #[arg(value_name = "INPUT FILE")]
    pub input: PathBuf,

    /// Hardware platform to use
    #[arg(short, long, value_enum)]
    pub platform: Option<Platform>,

    /// Precision model to use
    #[arg(short = 'q', long, value_enum)]
    pub precision: Option<Precision>,
}

/// 硬件平台
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Platform {
    Cpu,
    Cuda,
    Opencl,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Cpu => write!(f, "CPU"),
            Platform::Cuda => write!(f, "CUDA"),
            Platform::Opencl => write!(f, "OpenCL"),
        }
    }
}

/// 数值精度
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Precision {
    Single,
    Double,
    Mixed,
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::Single => write!(f, "single"),
            Precision::Double => write!(f, "double"),
            Precision::Mixed => write!(f, "mixed"),
        }
    }
}
