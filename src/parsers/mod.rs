//! # 格式解析器模块
//!
//! 提供各种模拟输入文件格式的底层解析器。每个解析器暴露
//! `parse_*_file` 入口和可从内存内容直接测试的
//! `parse_*_content` / `parse_*_bytes` 核心。
//!
//! 按扩展名分发给这些解析器的逻辑在 `loaders/` 中。
//!
//! ## 依赖关系
//! - 被 `loaders/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: pdb, prmtop, psf, amber_crd, namd_bin, xsc, state_xml,
//!   ffxml, charmm_par, frcmod

pub mod amber_crd;
pub mod charmm_par;
pub mod ffxml;
pub mod frcmod;
pub mod namd_bin;
pub mod pdb;
pub mod prmtop;
pub mod psf;
pub mod state_xml;
pub mod xsc;
