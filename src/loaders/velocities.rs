//! # 速度加载器
//!
//! 从速度文件读出速度数组。目前支持 vel (NAMD 二进制)。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/namd_bin.rs`

use crate::error::Result;
use crate::models::quantity::{Quantity, Unit};
use crate::parsers::namd_bin;
use std::path::Path;

/// 加载速度 (单位 Å/ps)
pub fn load(path: &Path) -> Result<Quantity> {
    let ext = super::extension_of(path)?;
    match ext.as_str() {
        "vel" => from_vel(path),
        _ => Err(super::unsupported(&ext, path)),
    }
}

fn from_vel(path: &Path) -> Result<Quantity> {
    let rows = namd_bin::parse_namd_bin_file(path)?;
    Ok(Quantity::new(rows, Unit::AngstromPerPicosecond))
}
