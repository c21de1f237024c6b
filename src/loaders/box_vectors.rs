//! # 盒子向量加载器
//!
//! 从扩展体系文件读出 3×3 盒子向量。目前支持 xsc (NAMD 文本)。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/xsc.rs`

use crate::error::Result;
use crate::models::quantity::Quantity;
use crate::parsers::xsc;
use std::path::Path;

/// 加载盒子向量 (单位 Å，对角)
pub fn load(path: &Path) -> Result<Quantity> {
    let ext = super::extension_of(path)?;
    match ext.as_str() {
        "xsc" => xsc::parse_xsc_file(path),
        _ => Err(super::unsupported(&ext, path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MdProtocolError;
    use crate::models::quantity::Unit;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_unknown_extension() {
        let err = load(&PathBuf::from("box.txt")).unwrap_err();
        assert!(matches!(err, MdProtocolError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_xsc_dispatch() {
        let dir =
            std::env::temp_dir().join(format!("mdprotocol-box-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.xsc");
        fs::write(&path, "step a_x b_y c_z\n0 10.0 20.0 30.0\n").unwrap();

        let q = load(&path).unwrap();
        assert_eq!(q.values[0], [10.0, 0.0, 0.0]);
        assert_eq!(q.values[1], [0.0, 20.0, 0.0]);
        assert_eq!(q.values[2], [0.0, 0.0, 30.0]);
        assert_eq!(q.unit, Unit::Angstrom);
    }
}
