//! # 重启动加载器
//!
//! 从序列化检查点重建状态容器 (位置 / 速度 / 盒子向量)。
//!
//! 两个变体：
//! - xml          - State XML，三段各自可缺省 (nm / nm/ps)
//! - rst, restart - AMBER rst7，位置必有；速度和盒子按数值总量
//!                  判定，缺失时对应字段留 `None`，绝不补零
//!
//! 重启动容器不携带构建上下文，由它组装的 `SystemHandler`
//! 不能执行 `create_system`。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/state_xml.rs`, `parsers/amber_crd.rs`

use crate::error::Result;
use crate::models::container::InputContainer;
use crate::models::quantity::{Quantity, Unit};
use crate::parsers::{amber_crd, state_xml};
use std::path::Path;

/// 加载重启动文件
pub fn load(path: &Path) -> Result<InputContainer> {
    let ext = super::extension_of(path)?;
    match ext.as_str() {
        "xml" => from_xml(path),
        "rst" | "restart" => from_rst(path),
        _ => Err(super::unsupported(&ext, path)),
    }
}

fn from_xml(path: &Path) -> Result<InputContainer> {
    let state = state_xml::parse_state_xml_file(path)?;

    let positions = state
        .positions
        .map(|rows| Quantity::new(rows, Unit::Nanometer));
    let velocities = state
        .velocities
        .map(|rows| Quantity::new(rows, Unit::NanometerPerPicosecond));
    let box_vectors = state
        .box_vectors
        .map(|rows| Quantity::new(rows.to_vec(), Unit::Nanometer));

    InputContainer::from_parts(None, positions, velocities, box_vectors)
}

fn from_rst(path: &Path) -> Result<InputContainer> {
    let rst = amber_crd::parse_amber_crd_file(path)?;

    let positions = Some(Quantity::new(rst.positions, Unit::Angstrom));
    let velocities = rst
        .velocities
        .map(|rows| Quantity::new(rows, Unit::AngstromPerPicosecond));
    let box_vectors = match rst.box_lengths {
        Some([a, b, c]) => Some(Quantity::diagonal_box(a, b, c, Unit::Angstrom)?),
        None => None,
    };

    InputContainer::from_parts(None, positions, velocities, box_vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MdProtocolError;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mdprotocol-restart-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_unknown_extension() {
        let err = load(&PathBuf::from("state.chk")).unwrap_err();
        assert!(matches!(err, MdProtocolError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_rst_without_velocities_or_box_leaves_fields_none() {
        let path = scratch_file(
            "bare.rst",
            "bare\n    1\n   1.0000000   2.0000000   3.0000000\n",
        );
        let container = load(&path).unwrap();
        assert!(container.has_positions());
        assert!(!container.has_velocities());
        assert!(!container.has_box());
    }

    #[test]
    fn test_rst_with_velocities_and_box() {
        let path = scratch_file(
            "full.rst",
            "full\n    1     1.0000000\n   1.0000000   2.0000000   3.0000000\n   0.1000000   0.2000000   0.3000000\n  25.0000000  26.0000000  27.0000000  90.0000000  90.0000000  90.0000000\n",
        );
        let container = load(&path).unwrap();
        assert!(container.has_velocities());
        let bv = container.box_vectors().unwrap();
        assert_eq!(bv.values[0], [25.0, 0.0, 0.0]);
        assert_eq!(bv.values[1], [0.0, 26.0, 0.0]);
        assert_eq!(bv.values[2], [0.0, 0.0, 27.0]);
    }

    #[test]
    fn test_xml_state_with_missing_sections() {
        let path = scratch_file(
            "pos.xml",
            r#"<State><Positions><Position x="1" y="2" z="3"/></Positions></State>"#,
        );
        let container = load(&path).unwrap();
        assert!(container.has_positions());
        assert!(!container.has_velocities());
        assert!(!container.has_box());
        assert_eq!(container.positions().unwrap().unit, Unit::Nanometer);
    }

    #[test]
    fn test_restart_container_has_no_topology() {
        let path = scratch_file(
            "topo.rst",
            "t\n    1\n   1.0000000   2.0000000   3.0000000\n",
        );
        let container = load(&path).unwrap();
        assert!(!container.has_topology());
    }
}
