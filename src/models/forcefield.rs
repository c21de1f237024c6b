//! # 力场与参数集数据模型
//!
//! 定义 FFXML 力场 (`ForceField`) 和 CHARMM 参数集
//! (`CharmmParameterSet`) 的内存表示。解析由 `parsers/ffxml.rs` 和
//! `parsers/charmm_par.rs` 完成，这里只保存聚合结果。
//!
//! ## 依赖关系
//! - 被 `loaders/system.rs` 使用
//! - 由 `parsers/ffxml.rs`, `parsers/charmm_par.rs` 填充

use serde::{Deserialize, Serialize};

/// FFXML 原子类型定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomType {
    /// 类型名 (如 "protein-C")
    pub name: String,

    /// 类型所属 class
    pub class: String,

    /// 元素符号
    pub element: String,

    /// 原子质量 (amu)
    pub mass: f64,
}

/// 力场 (一个或多个 FFXML 文件的合并结果)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForceField {
    /// 来源文件名或内建力场名
    pub sources: Vec<String>,

    /// 原子类型
    pub atom_types: Vec<AtomType>,

    /// 残基模板名
    pub residue_templates: Vec<String>,

    /// 各类参数条目数
    pub n_bond_params: usize,
    pub n_angle_params: usize,
    pub n_torsion_params: usize,
    pub n_nonbonded_params: usize,
}

impl ForceField {
    pub fn new() -> Self {
        ForceField::default()
    }

    /// 合并另一个力场文件的内容
    pub fn merge(&mut self, other: ForceField) {
        self.sources.extend(other.sources);
        self.atom_types.extend(other.atom_types);
        self.residue_templates.extend(other.residue_templates);
        self.n_bond_params += other.n_bond_params;
        self.n_angle_params += other.n_angle_params;
        self.n_torsion_params += other.n_torsion_params;
        self.n_nonbonded_params += other.n_nonbonded_params;
    }

    pub fn n_atom_types(&self) -> usize {
        self.atom_types.len()
    }

    /// 简短描述 (用于摘要输出)
    pub fn describe(&self) -> String {
        self.sources.join(", ")
    }
}

/// CHARMM 键参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharmmBondParam {
    pub class_i: String,
    pub class_j: String,
    /// 力常数 (kcal/mol/Å²)
    pub k: f64,
    /// 平衡键长 (Å)
    pub r0: f64,
}

/// CHARMM 角参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharmmAngleParam {
    pub class_i: String,
    pub class_j: String,
    pub class_k: String,
    /// 力常数 (kcal/mol/rad²)
    pub k: f64,
    /// 平衡角 (度)
    pub theta0: f64,
}

/// CHARMM 二面角参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharmmDihedralParam {
    pub classes: [String; 4],
    pub k: f64,
    pub multiplicity: i32,
    pub phase: f64,
}

/// CHARMM 非键参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharmmNonbondedParam {
    pub class: String,
    /// 势阱深度 (kcal/mol，文件中为负值)
    pub epsilon: f64,
    /// R_min/2 (Å)
    pub rmin_half: f64,
}

/// CHARMM 参数集 (一个或多个 .par/.str 文件的合并结果)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharmmParameterSet {
    /// 来源文件名
    pub sources: Vec<String>,

    pub bonds: Vec<CharmmBondParam>,
    pub angles: Vec<CharmmAngleParam>,
    pub dihedrals: Vec<CharmmDihedralParam>,
    pub nonbonded: Vec<CharmmNonbondedParam>,
}

impl CharmmParameterSet {
    pub fn new() -> Self {
        CharmmParameterSet::default()
    }

    pub fn merge(&mut self, other: CharmmParameterSet) {
        self.sources.extend(other.sources);
        self.bonds.extend(other.bonds);
        self.angles.extend(other.angles);
        self.dihedrals.extend(other.dihedrals);
        self.nonbonded.extend(other.nonbonded);
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
            && self.angles.is_empty()
            && self.dihedrals.is_empty()
            && self.nonbonded.is_empty()
    }

    pub fn describe(&self) -> String {
        self.sources.join(", ")
    }
}
