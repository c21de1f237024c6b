//! # 加载器模块
//!
//! 按文件扩展名分发的加载器族。每族维护一张固定的
//! 扩展名 → 处理函数映射表：扩展名统一小写、去掉前导点后查表，
//! 不在表内即返回 `UnsupportedFormat`；实际解析交给 `parsers/`。
//!
//! ## 加载器族
//! - `system`      - 拓扑 + 构建上下文 (pdb, prmtop, top, psf)
//! - `positions`   - 坐标 (pdb, coor, inpcrd, crd)
//! - `velocities`  - 速度 (vel)
//! - `box_vectors` - 盒子向量 (xsc)
//! - `restart`     - 重启动状态 (xml, rst, restart)
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `parsers/`, `models/`

pub mod box_vectors;
pub mod positions;
pub mod restart;
pub mod system;
pub mod velocities;

use crate::error::{MdProtocolError, Result};
use std::path::Path;

/// 提取小写、无前导点的扩展名
///
/// 无扩展名的路径无从分发，按 `UnsupportedFormat` 处理。
pub(crate) fn extension_of(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| MdProtocolError::UnsupportedFormat {
            extension: String::new(),
            path: path.display().to_string(),
        })
}

/// 统一的"扩展名不在表内"错误
pub(crate) fn unsupported(extension: &str, path: &Path) -> MdProtocolError {
    MdProtocolError::UnsupportedFormat {
        extension: extension.to_string(),
        path: path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extension_lowercased() {
        let path = PathBuf::from("structure.PDB");
        assert_eq!(extension_of(&path).unwrap(), "pdb");
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let path = PathBuf::from("POSCAR");
        assert!(matches!(
            extension_of(&path),
            Err(MdProtocolError::UnsupportedFormat { .. })
        ));
    }
}
