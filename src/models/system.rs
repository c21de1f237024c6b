//! # 体系构建数据模型
//!
//! `System` 是 `create_system` 的产物：参数解析完成后的体系摘要。
//! 实际的模拟引擎（积分器、平台执行）不在本工具范围内。
//!
//! ## 依赖关系
//! - 被 `loaders/system.rs` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 体系构建选项 (来自协议文件的 `system_options` 段)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemOptions {
    /// 非键截断半径 (nm)
    pub nonbonded_cutoff: f64,

    /// 约束方案 (none / h-bonds / all-bonds)
    pub constraints: String,

    /// 是否保持水分子刚性
    pub rigid_water: bool,
}

impl Default for SystemOptions {
    fn default() -> Self {
        SystemOptions {
            nonbonded_cutoff: 1.0,
            constraints: "none".to_string(),
            rigid_water: true,
        }
    }
}

/// 参数解析后的体系摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct System {
    /// 粒子数
    pub n_particles: usize,

    /// 键数
    pub n_bonds: usize,

    /// 参数来源描述 (力场文件 / prmtop / CHARMM 参数集)
    pub parameter_source: String,

    /// 构建时采用的选项
    pub options: SystemOptions,
}
