//! # AMBER prmtop 格式解析器
//!
//! 解析 AMBER7 拓扑/参数文件 (.prmtop / .top)。文件由 %FLAG 分节，
//! 每节带 %FORMAT 说明，数据行为固定宽度字段。这里提取构建拓扑
//! 所需的节：POINTERS, ATOM_NAME, MASS, RESIDUE_LABEL,
//! RESIDUE_POINTER, BONDS_INC_HYDROGEN, BONDS_WITHOUT_HYDROGEN。
//!
//! ## 依赖关系
//! - 被 `loaders/system.rs` 使用
//! - 使用 `models/topology.rs`

use crate::error::{MdProtocolError, Result};
use crate::models::topology::{element_from_name, Bond, TopAtom, Topology};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// POINTERS 节中的索引位置
const PTR_NATOM: usize = 0;
const PTR_NRES: usize = 11;

/// prmtop 文件解析结果
#[derive(Debug, Clone)]
pub struct PrmtopFile {
    pub topology: Topology,
    /// 原子质量 (amu)，体系构建用
    pub masses: Vec<f64>,
}

/// 解析 prmtop 文件
pub fn parse_prmtop_file(path: &Path) -> Result<PrmtopFile> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_prmtop_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 prmtop 格式
pub fn parse_prmtop_content(content: &str, origin: &str) -> Result<PrmtopFile> {
    let sections = scan_sections(content);

    let pointers = int_section(&sections, "POINTERS", origin)?;
    if pointers.len() <= PTR_NRES {
        return Err(parse_error(origin, "POINTERS section too short"));
    }
    let n_atoms = pointers[PTR_NATOM] as usize;
    let n_residues = pointers[PTR_NRES] as usize;

    let atom_names = fixed_width_section(&sections, "ATOM_NAME", 4);
    if atom_names.len() < n_atoms {
        return Err(parse_error(
            origin,
            &format!(
                "ATOM_NAME holds {} entries, POINTERS declares {} atoms",
                atom_names.len(),
                n_atoms
            ),
        ));
    }

    let residue_labels = fixed_width_section(&sections, "RESIDUE_LABEL", 4);
    let residue_pointers = int_section(&sections, "RESIDUE_POINTER", origin)?;
    if residue_labels.len() < n_residues || residue_pointers.len() < n_residues {
        return Err(parse_error(origin, "residue sections shorter than NRES"));
    }

    let masses = float_section(&sections, "MASS", origin)?;

    // RESIDUE_POINTER 是每个残基首原子的 1-based 序号
    let mut atoms = Vec::with_capacity(n_atoms);
    let mut res_idx = 0usize;
    for (i, name) in atom_names.iter().take(n_atoms).enumerate() {
        while res_idx + 1 < n_residues && (residue_pointers[res_idx + 1] as usize) <= i + 1 {
            res_idx += 1;
        }
        atoms.push(TopAtom {
            name: name.clone(),
            element: element_from_name(name),
            residue_name: residue_labels[res_idx].clone(),
            residue_index: res_idx,
            chain_id: "A".to_string(),
        });
    }

    // 键节是 (i*3, j*3, type_index) 三元组，原子索引需除以 3
    let mut bonds = Vec::new();
    for flag in ["BONDS_INC_HYDROGEN", "BONDS_WITHOUT_HYDROGEN"] {
        if let Some(values) = sections.get(flag) {
            let ints: Vec<i64> = values
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            for triplet in ints.chunks_exact(3) {
                let i = (triplet[0] / 3) as usize;
                let j = (triplet[1] / 3) as usize;
                if i < n_atoms && j < n_atoms {
                    bonds.push(Bond {
                        i: i.min(j),
                        j: i.max(j),
                    });
                }
            }
        }
    }
    bonds.sort_unstable_by_key(|b| (b.i, b.j));
    bonds.dedup();

    Ok(PrmtopFile {
        topology: Topology { atoms, bonds },
        masses,
    })
}

/// 扫描 %FLAG 分节，忽略 %FORMAT 和 %VERSION 行
fn scan_sections(content: &str) -> HashMap<String, String> {
    let mut sections: HashMap<String, String> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("%FLAG") {
            let name = rest.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
        } else if line.starts_with('%') {
            // %FORMAT / %VERSION / %COMMENT
            continue;
        } else if let Some(ref name) = current {
            let entry = sections.entry(name.clone()).or_default();
            entry.push_str(line);
            entry.push('\n');
        }
    }
    sections
}

fn int_section(sections: &HashMap<String, String>, flag: &str, origin: &str) -> Result<Vec<i64>> {
    let raw = sections
        .get(flag)
        .ok_or_else(|| parse_error(origin, &format!("missing %FLAG {}", flag)))?;
    Ok(raw.split_whitespace().filter_map(|s| s.parse().ok()).collect())
}

fn float_section(sections: &HashMap<String, String>, flag: &str, origin: &str) -> Result<Vec<f64>> {
    let raw = sections
        .get(flag)
        .ok_or_else(|| parse_error(origin, &format!("missing %FLAG {}", flag)))?;
    Ok(raw.split_whitespace().filter_map(|s| s.parse().ok()).collect())
}

/// 固定宽度字段节 (20a4 之类)，字段可能含空格，按宽度切分
fn fixed_width_section(
    sections: &HashMap<String, String>,
    flag: &str,
    width: usize,
) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(raw) = sections.get(flag) {
        for line in raw.lines() {
            let bytes = line.as_bytes();
            let mut pos = 0;
            while pos < bytes.len() {
                let end = (pos + width).min(bytes.len());
                if let Ok(field) = std::str::from_utf8(&bytes[pos..end]) {
                    let trimmed = field.trim();
                    if !trimmed.is_empty() {
                        out.push(trimmed.to_string());
                    }
                }
                pos += width;
            }
        }
    }
    out
}

fn parse_error(origin: &str, reason: &str) -> MdProtocolError {
    MdProtocolError::ParseError {
        format: "prmtop".to_string(),
        path: origin.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 三原子水分子的最小 prmtop 片段
    const SAMPLE: &str = "\
%VERSION  VERSION_STAMP = V0001.000
%FLAG POINTERS
%FORMAT(10I8)
       3       2       2       0       0       0       0       0       0       0
       0       1       0       0       0       0       0       0       0       0
       0       0       0       0       0       0       0       0       0       0
       0
%FLAG ATOM_NAME
%FORMAT(20a4)
O   H1  H2
%FLAG MASS
%FORMAT(5E16.8)
  1.60000000E+01  1.00800000E+00  1.00800000E+00
%FLAG RESIDUE_LABEL
%FORMAT(20a4)
WAT
%FLAG RESIDUE_POINTER
%FORMAT(10I8)
       1
%FLAG BONDS_INC_HYDROGEN
%FORMAT(10I8)
       0       3       1       0       6       1
";

    #[test]
    fn test_parse_water() {
        let prmtop = parse_prmtop_content(SAMPLE, "wat.prmtop").unwrap();
        assert_eq!(prmtop.topology.n_atoms(), 3);
        assert_eq!(prmtop.topology.atoms[0].name, "O");
        assert_eq!(prmtop.topology.atoms[0].element, "O");
        assert_eq!(prmtop.topology.atoms[1].name, "H1");
        assert_eq!(prmtop.topology.atoms[0].residue_name, "WAT");
    }

    #[test]
    fn test_bond_indices_divided_by_three() {
        let prmtop = parse_prmtop_content(SAMPLE, "wat.prmtop").unwrap();
        assert_eq!(
            prmtop.topology.bonds,
            vec![Bond { i: 0, j: 1 }, Bond { i: 0, j: 2 }]
        );
    }

    #[test]
    fn test_masses() {
        let prmtop = parse_prmtop_content(SAMPLE, "wat.prmtop").unwrap();
        assert_eq!(prmtop.masses.len(), 3);
        assert!((prmtop.masses[0] - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_pointers_is_parse_error() {
        let result = parse_prmtop_content("%FLAG ATOM_NAME\nO   \n", "bad.prmtop");
        assert!(result.is_err());
    }
}
