//! # 协议文件配置模块
//!
//! 使用 `serde_yaml` 读取 YAML 协议文件：各输入文件路径、力场/
//! 参数列表和体系构建选项。相对路径按协议文件所在目录解析。
//!
//! ## 协议文件样例
//! ```yaml
//! topology: sys.psf
//! positions: sys.pdb
//! box: output.xsc
//! charmm_parameters: [toppar/par_all36m_prot.prm]
//! system_options:
//!   nonbonded_cutoff: 1.2
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/system.rs`

use crate::error::{MdProtocolError, Result};
use crate::models::system::SystemOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 协议文件内容
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolConfig {
    /// 协议名 (输出命名用)
    #[serde(default)]
    pub name: Option<String>,

    /// 拓扑文件 (pdb / prmtop / top / psf)
    pub topology: PathBuf,

    /// 坐标文件，覆盖拓扑自带的坐标
    #[serde(default)]
    pub positions: Option<PathBuf>,

    /// 速度文件
    #[serde(default)]
    pub velocities: Option<PathBuf>,

    /// 盒子向量文件
    #[serde(default, rename = "box")]
    pub box_vectors: Option<PathBuf>,

    /// 重启动检查点，其内容覆盖以上坐标/速度/盒子
    #[serde(default)]
    pub checkpoint: Option<PathBuf>,

    /// 力场文件路径或内建力场名 (pdb 拓扑用)
    #[serde(default)]
    pub forcefields: Vec<String>,

    /// CHARMM 参数文件 (psf 拓扑用)
    #[serde(default)]
    pub charmm_parameters: Vec<PathBuf>,

    /// 体系构建选项
    #[serde(default)]
    pub system_options: SystemOptions,
}

/// 读取并解析协议文件，相对路径按文件所在目录解析
pub fn load_protocol_file(path: &Path) -> Result<ProtocolConfig> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut config = parse_protocol_content(&content, &path.display().to_string())?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    resolve_paths(&mut config, base);
    Ok(config)
}

/// 从字符串内容解析协议
pub fn parse_protocol_content(content: &str, origin: &str) -> Result<ProtocolConfig> {
    serde_yaml::from_str(content).map_err(|e| MdProtocolError::ConfigError {
        path: origin.to_string(),
        reason: e.to_string(),
    })
}

/// 将相对路径锚定到协议文件所在目录
fn resolve_paths(config: &mut ProtocolConfig, base: &Path) {
    let anchor = |p: &mut PathBuf| {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    };

    anchor(&mut config.topology);
    if let Some(ref mut p) = config.positions {
        anchor(p);
    }
    if let Some(ref mut p) = config.velocities {
        anchor(p);
    }
    if let Some(ref mut p) = config.box_vectors {
        anchor(p);
    }
    if let Some(ref mut p) = config.checkpoint {
        anchor(p);
    }
    for p in &mut config.charmm_parameters {
        anchor(p);
    }
    // 力场条目可能是内建名：只有锚定后确实存在的才改写
    for entry in &mut config.forcefields {
        let candidate = base.join(entry.as_str());
        if Path::new(entry.as_str()).is_relative() && candidate.exists() {
            *entry = candidate.display().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = parse_protocol_content("topology: sys.prmtop\n", "p.yaml").unwrap();
        assert_eq!(config.topology, PathBuf::from("sys.prmtop"));
        assert!(config.positions.is_none());
        assert!(config.forcefields.is_empty());
        // 默认体系选项
        assert!((config.system_options.nonbonded_cutoff - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_config() {
        let content = "\
name: npt-equilibration
topology: sys.psf
positions: sys.pdb
velocities: out.vel
box: out.xsc
checkpoint: out.rst
charmm_parameters:
  - par_all36m_prot.prm
system_options:
  nonbonded_cutoff: 1.2
  constraints: h-bonds
  rigid_water: false
";
        let config = parse_protocol_content(content, "p.yaml").unwrap();
        assert_eq!(config.name.as_deref(), Some("npt-equilibration"));
        assert_eq!(config.box_vectors, Some(PathBuf::from("out.xsc")));
        assert_eq!(config.charmm_parameters.len(), 1);
        assert!((config.system_options.nonbonded_cutoff - 1.2).abs() < 1e-12);
        assert_eq!(config.system_options.constraints, "h-bonds");
        assert!(!config.system_options.rigid_water);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let result = parse_protocol_content("topology: [unclosed\n", "bad.yaml");
        assert!(matches!(result, Err(MdProtocolError::ConfigError { .. })));
    }

    #[test]
    fn test_missing_topology_is_config_error() {
        let result = parse_protocol_content("positions: a.pdb\n", "bad.yaml");
        assert!(matches!(result, Err(MdProtocolError::ConfigError { .. })));
    }

    #[test]
    fn test_relative_paths_anchored_to_config_dir() {
        let mut config = parse_protocol_content(
            "topology: sys.prmtop\ncheckpoint: out/run.rst\n",
            "p.yaml",
        )
        .unwrap();
        resolve_paths(&mut config, Path::new("/data/project"));
        assert_eq!(config.topology, PathBuf::from("/data/project/sys.prmtop"));
        assert_eq!(
            config.checkpoint,
            Some(PathBuf::from("/data/project/out/run.rst"))
        );
    }

    #[test]
    fn test_builtin_forcefield_names_left_alone() {
        let mut config = parse_protocol_content(
            "topology: sys.pdb\nforcefields: [amber14-all.xml]\n",
            "p.yaml",
        )
        .unwrap();
        resolve_paths(&mut config, Path::new("/nonexistent/dir"));
        assert_eq!(config.forcefields, vec!["amber14-all.xml".to_string()]);
    }
}
