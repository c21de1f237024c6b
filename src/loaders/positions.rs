//! # 坐标加载器
//!
//! 从坐标文件读出位置数组。支持 pdb、coor (NAMD 二进制)、
//! inpcrd/crd (AMBER 文本)。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/pdb.rs`, `parsers/namd_bin.rs`, `parsers/amber_crd.rs`

use crate::error::Result;
use crate::models::quantity::{Quantity, Unit};
use crate::parsers::{amber_crd, namd_bin, pdb};
use std::path::Path;

/// 加载坐标 (长度单位 Å)
pub fn load(path: &Path) -> Result<Quantity> {
    let ext = super::extension_of(path)?;
    match ext.as_str() {
        "pdb" => from_pdb(path),
        "coor" => from_coor(path),
        "inpcrd" | "crd" => from_inpcrd(path),
        _ => Err(super::unsupported(&ext, path)),
    }
}

fn from_pdb(path: &Path) -> Result<Quantity> {
    let parsed = pdb::parse_pdb_file(path)?;
    Ok(parsed.positions)
}

fn from_coor(path: &Path) -> Result<Quantity> {
    let rows = namd_bin::parse_namd_bin_file(path)?;
    Ok(Quantity::new(rows, Unit::Angstrom))
}

fn from_inpcrd(path: &Path) -> Result<Quantity> {
    let parsed = amber_crd::parse_amber_crd_file(path)?;
    Ok(Quantity::new(parsed.positions, Unit::Angstrom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MdProtocolError;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_file(name: &str, content: &[u8]) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("mdprotocol-positions-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_unknown_extension() {
        let err = load(&PathBuf::from("coords.dcd")).unwrap_err();
        assert!(matches!(
            err,
            MdProtocolError::UnsupportedFormat { ref extension, .. } if extension == "dcd"
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load(&PathBuf::from("/no/such/file.inpcrd")).unwrap_err();
        assert!(matches!(err, MdProtocolError::FileReadError { .. }));
    }

    #[test]
    fn test_pdb_dispatch() {
        let path = scratch_file(
            "one.pdb",
            b"ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N\n",
        );
        let q = load(&path).unwrap();
        assert_eq!(q.len(), 1);
        assert_eq!(q.unit, Unit::Angstrom);
        assert!((q.values[0][0] - 11.104).abs() < 1e-9);
    }

    #[test]
    fn test_coor_dispatch() {
        let mut data = Vec::new();
        data.extend_from_slice(&1i32.to_le_bytes());
        for v in [1.5f64, -2.0, 3.25] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let path = scratch_file("one.coor", &data);
        let q = load(&path).unwrap();
        assert_eq!(q.values, vec![[1.5, -2.0, 3.25]]);
        assert_eq!(q.unit, Unit::Angstrom);
    }

    #[test]
    fn test_inpcrd_and_crd_dispatch() {
        let content = b"one\n    1\n   1.0000000   2.0000000   3.0000000\n";
        for name in ["one.inpcrd", "one.crd"] {
            let path = scratch_file(name, content);
            let q = load(&path).unwrap();
            assert_eq!(q.values, vec![[1.0, 2.0, 3.0]]);
            assert_eq!(q.unit, Unit::Angstrom);
        }
    }
}
