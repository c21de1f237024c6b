//! # 拓扑结构数据模型
//!
//! 定义分子体系的结构描述（原子、键、链），与坐标无关。
//! 由各格式解析器填充，供下游体系构建使用。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `loaders/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 拓扑中的原子
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopAtom {
    /// 原子名 (如 "CA", "HB1")
    pub name: String,

    /// 元素符号
    pub element: String,

    /// 所属残基名 (如 "ALA", "WAT")
    pub residue_name: String,

    /// 残基序号 (0-based，全局)
    pub residue_index: usize,

    /// 链标识
    pub chain_id: String,
}

/// 键 (原子索引对，0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
}

/// 分子拓扑
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    /// 原子列表
    pub atoms: Vec<TopAtom>,

    /// 键列表
    pub bonds: Vec<Bond>,
}

impl Topology {
    pub fn new() -> Self {
        Topology::default()
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn n_bonds(&self) -> usize {
        self.bonds.len()
    }

    /// 残基数 (不同 residue_index 的个数)
    pub fn n_residues(&self) -> usize {
        let mut seen: Vec<usize> = self.atoms.iter().map(|a| a.residue_index).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    /// 链数
    pub fn n_chains(&self) -> usize {
        use std::collections::BTreeSet;
        self.atoms
            .iter()
            .map(|a| a.chain_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// 计算化学式 (按元素符号排序)
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// 从原子名推断元素符号
///
/// PDB 和 PSF 文件经常缺失元素列，按惯例取首个字母字符；
/// 以数字开头的氢命名 (如 "1HB") 归为 H。
pub fn element_from_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();

    match chars.next() {
        Some(c) if c.is_ascii_digit() => "H".to_string(),
        Some(c) if c.is_ascii_alphabetic() => {
            // 双字符元素：首字母大写 + 次字母小写的常见金属/卤素
            let upper = c.to_ascii_uppercase();
            if let Some(next) = chars.next() {
                let candidate = format!("{}{}", upper, next.to_ascii_lowercase());
                // "Ca" 故意不在列表中：PDB 的 "CA" 几乎总是 α-碳
                const TWO_LETTER: &[&str] =
                    &["Cl", "Br", "Na", "Mg", "Zn", "Fe", "Mn", "Cu", "Se"];
                if TWO_LETTER.contains(&candidate.as_str()) {
                    return candidate;
                }
            }
            upper.to_string()
        }
        _ => "X".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, element: &str, res: usize, chain: &str) -> TopAtom {
        TopAtom {
            name: name.to_string(),
            element: element.to_string(),
            residue_name: "ALA".to_string(),
            residue_index: res,
            chain_id: chain.to_string(),
        }
    }

    #[test]
    fn test_counts() {
        let top = Topology {
            atoms: vec![
                atom("N", "N", 0, "A"),
                atom("CA", "C", 0, "A"),
                atom("N", "N", 1, "B"),
            ],
            bonds: vec![Bond { i: 0, j: 1 }],
        };
        assert_eq!(top.n_atoms(), 3);
        assert_eq!(top.n_bonds(), 1);
        assert_eq!(top.n_residues(), 2);
        assert_eq!(top.n_chains(), 2);
    }

    #[test]
    fn test_formula() {
        let top = Topology {
            atoms: vec![
                atom("C1", "C", 0, "A"),
                atom("C2", "C", 0, "A"),
                atom("O1", "O", 0, "A"),
            ],
            bonds: vec![],
        };
        assert_eq!(top.formula(), "C2O");
    }

    #[test]
    fn test_element_from_name() {
        assert_eq!(element_from_name("CA"), "C");
        assert_eq!(element_from_name("1HB"), "H");
        assert_eq!(element_from_name("Cl-"), "Cl");
        assert_eq!(element_from_name("NA+"), "Na");
        assert_eq!(element_from_name(""), "X");
    }
}
