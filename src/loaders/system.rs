//! # 体系加载器
//!
//! 从拓扑文件构建 `SystemHandler`：输入容器 + 构建上下文
//! (`Master`)。三个格式变体：
//! - pdb          - 自描述结构格式，带坐标、可能带盒子；需要力场
//!                  文件列表 (缺省时使用默认列表)，.frcmod 先规范化
//!                  为 FFXML
//! - prmtop, top  - AMBER 参数+拓扑二进制文本格式，无需辅助文件
//! - psf          - CHARMM 结构格式，必须提供参数文件，否则
//!                  `MissingRequiredArgument`
//!
//! `Master` 是格式专属上下文的和类型，`create_system` 对其做
//! 穷尽匹配；没有 master 的容器 (重启动文件) 无法构建体系。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/pdb.rs`, `parsers/prmtop.rs`, `parsers/psf.rs`,
//!   `parsers/ffxml.rs`, `parsers/charmm_par.rs`, `parsers/frcmod.rs`

use crate::error::{MdProtocolError, Result};
use crate::models::container::InputContainer;
use crate::models::forcefield::{CharmmParameterSet, ForceField};
use crate::models::system::{System, SystemOptions};
use crate::parsers::{charmm_par, ffxml, frcmod, pdb, prmtop, psf};
use crate::utils::output;
use std::path::{Path, PathBuf};

/// 未指定力场时使用的默认列表
pub const DEFAULT_FORCEFIELDS: &[&str] = &["amber14-all.xml", "amber14/tip3p.xml"];

/// 引擎自带数据的内建力场名：按名字引用即可，不要求文件存在
const BUILTIN_FORCEFIELDS: &[&str] = &[
    "amber14-all.xml",
    "amber14/tip3p.xml",
    "amber99sb.xml",
    "amber99sbildn.xml",
    "amber03.xml",
    "amber10.xml",
    "charmm36.xml",
    "tip3p.xml",
];

/// 格式专属的构建上下文
#[derive(Debug, Clone)]
pub enum Master {
    /// PDB 变体：外部力场
    Pdb { forcefield: ForceField },
    /// prmtop 变体：参数内嵌，保留质量表
    Prmtop { masses: Vec<f64> },
    /// PSF 变体：CHARMM 参数集
    Psf { parameters: CharmmParameterSet },
}

impl Master {
    /// 变体名 (摘要输出用)
    pub fn kind(&self) -> &'static str {
        match self {
            Master::Pdb { .. } => "pdb",
            Master::Prmtop { .. } => "prmtop",
            Master::Psf { .. } => "psf",
        }
    }
}

/// 体系加载选项
#[derive(Debug, Clone, Default)]
pub struct SystemLoadOptions {
    /// FFXML / frcmod 文件路径或内建力场名 (pdb 变体)
    pub forcefields: Vec<String>,
    /// CHARMM 参数文件路径 (psf 变体)
    pub charmm_parameters: Vec<PathBuf>,
}

/// 拓扑 + 构建上下文
#[derive(Debug, Clone)]
pub struct SystemHandler {
    container: InputContainer,
    master: Option<Master>,
    path: Option<PathBuf>,
}

impl SystemHandler {
    /// 按扩展名分发加载
    pub fn load(path: &Path, options: &SystemLoadOptions) -> Result<Self> {
        let ext = super::extension_of(path)?;
        match ext.as_str() {
            "pdb" => Self::from_pdb(path, &options.forcefields),
            "prmtop" | "top" => Self::from_prmtop(path),
            "psf" => Self::from_psf(path, &options.charmm_parameters),
            _ => Err(super::unsupported(&ext, path)),
        }
    }

    /// 从 PDB 加载拓扑、坐标和可能的盒子
    ///
    /// 力场列表为空时使用 `DEFAULT_FORCEFIELDS` 并提示。
    pub fn from_pdb(path: &Path, forcefields: &[String]) -> Result<Self> {
        let parsed = pdb::parse_pdb_file(path)?;

        let default_list: Vec<String>;
        let effective = if forcefields.is_empty() {
            default_list = DEFAULT_FORCEFIELDS.iter().map(|s| s.to_string()).collect();
            output::print_info(&format!(
                "Forcefields for PDB not specified. Using default: {}",
                default_list.join(", ")
            ));
            &default_list[..]
        } else {
            forcefields
        };

        let forcefield = resolve_forcefields(effective)?;

        let container = InputContainer::from_parts(
            Some(parsed.topology),
            Some(parsed.positions),
            None,
            parsed.box_vectors,
        )?;

        Ok(SystemHandler {
            container,
            master: Some(Master::Pdb { forcefield }),
            path: Some(path.to_path_buf()),
        })
    }

    /// 从 prmtop 加载拓扑；参数内嵌，无辅助文件
    pub fn from_prmtop(path: &Path) -> Result<Self> {
        let parsed = prmtop::parse_prmtop_file(path)?;

        let container = InputContainer::from_parts(Some(parsed.topology), None, None, None)?;

        Ok(SystemHandler {
            container,
            master: Some(Master::Prmtop {
                masses: parsed.masses,
            }),
            path: Some(path.to_path_buf()),
        })
    }

    /// 从 PSF 加载拓扑；必须提供 CHARMM 参数文件
    pub fn from_psf(path: &Path, charmm_parameters: &[PathBuf]) -> Result<Self> {
        if charmm_parameters.is_empty() {
            return Err(MdProtocolError::MissingRequiredArgument(
                "PSF files require charmm_parameters".to_string(),
            ));
        }

        let parsed = psf::parse_psf_file(path)?;

        let mut parameters = CharmmParameterSet::new();
        for param_path in charmm_parameters {
            parameters.merge(charmm_par::parse_charmm_par_file(param_path)?);
        }

        let container = InputContainer::from_parts(Some(parsed.topology), None, None, None)?;

        Ok(SystemHandler {
            container,
            master: Some(Master::Psf { parameters }),
            path: Some(path.to_path_buf()),
        })
    }

    /// 包装一个没有构建上下文的容器 (重启动文件等)
    pub fn from_container(container: InputContainer) -> Self {
        SystemHandler {
            container,
            master: None,
            path: None,
        }
    }

    pub fn container(&self) -> &InputContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut InputContainer {
        &mut self.container
    }

    pub fn master(&self) -> Option<&Master> {
        self.master.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 以给定选项构建体系摘要
    ///
    /// 需要构建上下文；重启动文件组装的实例会失败。
    pub fn create_system(&self, options: &SystemOptions) -> Result<System> {
        let master = self.master.as_ref().ok_or_else(|| {
            MdProtocolError::UnusableInstance(
                "this instance is not able to create systems (no topology context)".to_string(),
            )
        })?;

        let topology = self.container.topology().ok_or_else(|| {
            MdProtocolError::UnusableInstance(
                "this instance has no topology to build a system from".to_string(),
            )
        })?;

        let parameter_source = match master {
            Master::Pdb { forcefield } => {
                format!("force field: {}", forcefield.describe())
            }
            Master::Prmtop { masses } => {
                format!("prmtop embedded parameters ({} masses)", masses.len())
            }
            Master::Psf { parameters } => {
                format!("CHARMM parameter set: {}", parameters.describe())
            }
        };

        Ok(System {
            n_particles: topology.n_atoms(),
            n_bonds: topology.n_bonds(),
            parameter_source,
            options: options.clone(),
        })
    }
}

/// 解析力场条目列表并合并
///
/// .frcmod 条目先规范化为 FFXML；存在的文件按 FFXML 解析；
/// 其余名字若在内建列表中按名记录，否则报 `FileNotFound`。
fn resolve_forcefields(entries: &[String]) -> Result<ForceField> {
    let mut merged = ForceField::new();

    for entry in entries {
        let path = Path::new(entry);
        if entry.ends_with(".frcmod") {
            let converted = frcmod::create_ffxml_file(path)?;
            merged.merge(ffxml::parse_ffxml_file(&converted)?);
        } else if path.exists() {
            merged.merge(ffxml::parse_ffxml_file(path)?);
        } else if BUILTIN_FORCEFIELDS.contains(&entry.as_str()) {
            let mut builtin = ForceField::new();
            builtin.sources = vec![entry.clone()];
            merged.merge(builtin);
        } else {
            return Err(MdProtocolError::FileNotFound {
                path: entry.clone(),
            });
        }
    }

    Ok(merged)
}
