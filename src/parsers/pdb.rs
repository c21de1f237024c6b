//! # PDB 格式解析器
//!
//! 解析 Protein Data Bank 结构文件：ATOM/HETATM 记录给出拓扑与
//! 坐标 (Å)，CRYST1 给出晶胞尺寸，CONECT 给出显式键。
//!
//! ## PDB 记录布局 (固定列宽，0-based 半开区间)
//! ```text
//! ATOM      1  CA  ALA A   2      11.104   6.134  -6.504  1.00  0.00           C
//!       [6,11) serial  [12,16) name  [17,20) resName  [21] chainID
//!       [22,26) resSeq  [30,38) x  [38,46) y  [46,54) z  [76,78) element
//! ```
//!
//! ## 依赖关系
//! - 被 `loaders/system.rs`, `loaders/positions.rs` 使用
//! - 使用 `models/topology.rs`, `models/quantity.rs`

use crate::error::{MdProtocolError, Result};
use crate::models::quantity::{Quantity, Unit};
use crate::models::topology::{element_from_name, Bond, TopAtom, Topology};
use std::fs;
use std::path::Path;

/// PDB 文件解析结果
#[derive(Debug, Clone)]
pub struct PdbFile {
    pub topology: Topology,
    /// 坐标 (Å)
    pub positions: Quantity,
    /// CRYST1 给出的对角盒子 (Å)，缺失则为 None
    pub box_vectors: Option<Quantity>,
}

/// 解析 PDB 文件
pub fn parse_pdb_file(path: &Path) -> Result<PdbFile> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_pdb_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 PDB 格式
pub fn parse_pdb_content(content: &str, origin: &str) -> Result<PdbFile> {
    let mut topology = Topology::new();
    let mut coords: Vec<[f64; 3]> = Vec::new();
    let mut box_vectors: Option<Quantity> = None;

    // serial -> 0-based 原子索引，CONECT 解析用
    let mut serial_to_index: std::collections::HashMap<i64, usize> =
        std::collections::HashMap::new();
    let mut residue_index: usize = 0;
    let mut last_residue_key: Option<(String, String)> = None;
    let mut conect_pairs: Vec<(i64, i64)> = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            let serial: i64 = column(line, 6, 11)
                .trim()
                .parse()
                .map_err(|_| parse_error(origin, line_no, "invalid atom serial"))?;
            let name = column(line, 12, 16).trim().to_string();
            let res_name = column(line, 17, 20).trim().to_string();
            let chain_id = {
                let c = column(line, 21, 22).trim();
                if c.is_empty() { "A" } else { c }.to_string()
            };
            let res_seq = column(line, 22, 26).trim().to_string();

            let x = parse_coord(line, 30, 38, origin, line_no)?;
            let y = parse_coord(line, 38, 46, origin, line_no)?;
            let z = parse_coord(line, 46, 54, origin, line_no)?;

            let element = {
                let e = column(line, 76, 78).trim();
                if e.is_empty() {
                    element_from_name(&name)
                } else {
                    normalize_element(e)
                }
            };

            // 残基边界：链 + 残基序号变化即新残基
            let key = (chain_id.clone(), res_seq);
            if let Some(ref last) = last_residue_key {
                if *last != key {
                    residue_index += 1;
                }
            }
            last_residue_key = Some(key);

            serial_to_index.insert(serial, topology.atoms.len());
            topology.atoms.push(TopAtom {
                name,
                element,
                residue_name: res_name,
                residue_index,
                chain_id,
            });
            coords.push([x, y, z]);
        } else if line.starts_with("CRYST1") {
            let a = parse_coord(line, 6, 15, origin, line_no)?;
            let b = parse_coord(line, 15, 24, origin, line_no)?;
            let c = parse_coord(line, 24, 33, origin, line_no)?;
            // P1 单位胞占位 (1 1 1) 视为无盒子
            if a > 1.0 || b > 1.0 || c > 1.0 {
                box_vectors = Some(Quantity::diagonal_box(a, b, c, Unit::Angstrom)?);
            }
        } else if line.starts_with("CONECT") {
            let fields: Vec<i64> = line[6..]
                .as_bytes()
                .chunks(5)
                .filter_map(|chunk| std::str::from_utf8(chunk).ok())
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if let Some((&first, rest)) = fields.split_first() {
                for &other in rest {
                    conect_pairs.push((first, other));
                }
            }
        }
    }

    if topology.atoms.is_empty() {
        return Err(MdProtocolError::ParseError {
            format: "pdb".to_string(),
            path: origin.to_string(),
            reason: "No ATOM or HETATM records found".to_string(),
        });
    }

    // CONECT 键去重 (每对只保留 i < j 方向)
    for (a, b) in conect_pairs {
        if let (Some(&i), Some(&j)) = (serial_to_index.get(&a), serial_to_index.get(&b)) {
            if i < j {
                topology.bonds.push(Bond { i, j });
            }
        }
    }
    topology.bonds.sort_unstable_by_key(|b| (b.i, b.j));
    topology.bonds.dedup();

    Ok(PdbFile {
        topology,
        positions: Quantity::new(coords, Unit::Angstrom),
        box_vectors,
    })
}

/// 安全列切片：行太短时返回空串
fn column(line: &str, start: usize, end: usize) -> &str {
    let bytes = line.as_bytes();
    if start >= bytes.len() {
        return "";
    }
    let end = end.min(bytes.len());
    std::str::from_utf8(&bytes[start..end]).unwrap_or("")
}

fn parse_coord(line: &str, start: usize, end: usize, origin: &str, line_no: usize) -> Result<f64> {
    column(line, start, end)
        .trim()
        .parse()
        .map_err(|_| parse_error(origin, line_no, "invalid numeric field"))
}

fn parse_error(origin: &str, line_no: usize, reason: &str) -> MdProtocolError {
    MdProtocolError::ParseError {
        format: "pdb".to_string(),
        path: origin.to_string(),
        reason: format!("{} at line {}", reason, line_no + 1),
    }
}

/// 元素列规范化：两字符大写 (如 "CL") 转为 "Cl"
fn normalize_element(e: &str) -> String {
    let mut chars = e.chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) => format!("{}{}", a.to_ascii_uppercase(), b.to_ascii_lowercase()),
        (Some(a), None) => a.to_ascii_uppercase().to_string(),
        _ => "X".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
CRYST1   40.000   42.000   44.000  90.00  90.00  90.00 P 1           1
ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00           C
ATOM      3  N   GLY A   2      12.051   7.914  -3.649  1.00  0.00           N
HETATM    4 CL    CL B   1       0.000   1.000   2.000  1.00  0.00          CL
CONECT    1    2
END
";

    #[test]
    fn test_parse_atoms_and_positions() {
        let pdb = parse_pdb_content(SAMPLE, "sample.pdb").unwrap();
        assert_eq!(pdb.topology.n_atoms(), 4);
        assert_eq!(pdb.positions.len(), 4);
        assert!((pdb.positions.values[0][0] - 11.104).abs() < 1e-9);
        assert_eq!(pdb.positions.unit, Unit::Angstrom);
    }

    #[test]
    fn test_residue_and_chain_assignment() {
        let pdb = parse_pdb_content(SAMPLE, "sample.pdb").unwrap();
        assert_eq!(pdb.topology.n_residues(), 3);
        assert_eq!(pdb.topology.n_chains(), 2);
        assert_eq!(pdb.topology.atoms[2].residue_name, "GLY");
    }

    #[test]
    fn test_cryst1_box() {
        let pdb = parse_pdb_content(SAMPLE, "sample.pdb").unwrap();
        let bv = pdb.box_vectors.unwrap();
        assert_eq!(bv.values[0], [40.0, 0.0, 0.0]);
        assert_eq!(bv.values[1], [0.0, 42.0, 0.0]);
        assert_eq!(bv.values[2], [0.0, 0.0, 44.0]);
    }

    #[test]
    fn test_conect_bonds() {
        let pdb = parse_pdb_content(SAMPLE, "sample.pdb").unwrap();
        assert_eq!(pdb.topology.bonds, vec![Bond { i: 0, j: 1 }]);
    }

    #[test]
    fn test_element_from_column() {
        let pdb = parse_pdb_content(SAMPLE, "sample.pdb").unwrap();
        assert_eq!(pdb.topology.atoms[3].element, "Cl");
    }

    #[test]
    fn test_no_atoms_is_parse_error() {
        let result = parse_pdb_content("REMARK nothing here\nEND\n", "empty.pdb");
        assert!(matches!(
            result,
            Err(MdProtocolError::ParseError { .. })
        ));
    }
}
