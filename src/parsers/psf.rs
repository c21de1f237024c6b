//! # CHARMM PSF 格式解析器
//!
//! 解析 CHARMM/X-PLOR 蛋白结构文件 (.psf)。PSF 只含拓扑与
//! 电荷/质量，不含坐标；参数需另行提供 (.par/.str)。
//!
//! ## 分节格式
//! ```text
//! PSF EXT
//!        n !NATOM
//!   index segment resid resname name type charge mass 0
//!   ...
//!        m !NBOND: bonds
//!   i1 j1 i2 j2 i3 j3 i4 j4       (每行最多 4 对，1-based)
//! ```
//!
//! ## 依赖关系
//! - 被 `loaders/system.rs` 使用
//! - 使用 `models/topology.rs`

use crate::error::{MdProtocolError, Result};
use crate::models::topology::{element_from_name, Bond, TopAtom, Topology};
use std::fs;
use std::path::Path;

/// PSF 文件解析结果
#[derive(Debug, Clone)]
pub struct PsfFile {
    pub topology: Topology,
    /// 部分电荷 (e)
    pub charges: Vec<f64>,
    /// 原子质量 (amu)
    pub masses: Vec<f64>,
}

/// 解析 PSF 文件
pub fn parse_psf_file(path: &Path) -> Result<PsfFile> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_psf_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 PSF 格式
pub fn parse_psf_content(content: &str, origin: &str) -> Result<PsfFile> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.first().map(|l| l.trim_start().starts_with("PSF")) != Some(true) {
        return Err(parse_error(origin, "missing PSF header line"));
    }

    let natom_header = find_section(&lines, "!NATOM")
        .ok_or_else(|| parse_error(origin, "missing !NATOM section"))?;
    let n_atoms = section_count(lines[natom_header], origin)?;

    let mut atoms = Vec::with_capacity(n_atoms);
    let mut charges = Vec::with_capacity(n_atoms);
    let mut masses = Vec::with_capacity(n_atoms);
    // (segment, resid) -> 残基序号
    let mut residue_key: Option<(String, String)> = None;
    let mut residue_index = 0usize;

    for offset in 0..n_atoms {
        let line = lines
            .get(natom_header + 1 + offset)
            .ok_or_else(|| parse_error(origin, "!NATOM section truncated"))?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 8 {
            return Err(parse_error(
                origin,
                &format!("atom line has {} fields, expected at least 8", fields.len()),
            ));
        }

        let segment = fields[1].to_string();
        let resid = fields[2].to_string();
        let res_name = fields[3].to_string();
        let name = fields[4].to_string();
        let charge: f64 = fields[6]
            .parse()
            .map_err(|_| parse_error(origin, "invalid charge field"))?;
        let mass: f64 = fields[7]
            .parse()
            .map_err(|_| parse_error(origin, "invalid mass field"))?;

        let key = (segment.clone(), resid);
        if let Some(ref last) = residue_key {
            if *last != key {
                residue_index += 1;
            }
        }
        residue_key = Some(key);

        atoms.push(TopAtom {
            element: element_from_name(&name),
            name,
            residue_name: res_name,
            residue_index,
            chain_id: segment,
        });
        charges.push(charge);
        masses.push(mass);
    }

    // !NBOND 可选，一些最简 PSF 没有键节
    let mut bonds = Vec::new();
    if let Some(nbond_header) = find_section(&lines, "!NBOND") {
        let n_bonds = section_count(lines[nbond_header], origin)?;
        let mut values: Vec<usize> = Vec::with_capacity(n_bonds * 2);
        let mut row = nbond_header + 1;
        while values.len() < n_bonds * 2 {
            let line = lines
                .get(row)
                .ok_or_else(|| parse_error(origin, "!NBOND section truncated"))?;
            for token in line.split_whitespace() {
                let v: usize = token
                    .parse()
                    .map_err(|_| parse_error(origin, "invalid bond index"))?;
                values.push(v);
            }
            row += 1;
        }
        for pair in values.chunks_exact(2) {
            if pair[0] == 0 || pair[1] == 0 {
                return Err(parse_error(origin, "bond indices are 1-based, found 0"));
            }
            let (i, j) = (pair[0] - 1, pair[1] - 1);
            bonds.push(Bond {
                i: i.min(j),
                j: i.max(j),
            });
        }
    }

    Ok(PsfFile {
        topology: Topology { atoms, bonds },
        charges,
        masses,
    })
}

/// 找到含指定节标记的行号
fn find_section(lines: &[&str], marker: &str) -> Option<usize> {
    lines.iter().position(|l| l.contains(marker))
}

/// 节头行的首个整数即条目数
fn section_count(line: &str, origin: &str) -> Result<usize> {
    line.split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| parse_error(origin, "section header missing count"))
}

fn parse_error(origin: &str, reason: &str) -> MdProtocolError {
    MdProtocolError::ParseError {
        format: "psf".to_string(),
        path: origin.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
PSF EXT

         1 !NTITLE
 REMARKS generated structure

         3 !NATOM
         1 WT1  1    TIP3 OH2  OT    -0.834000       15.9994           0
         2 WT1  1    TIP3 H1   HT     0.417000        1.0080           0
         3 WT1  1    TIP3 H2   HT     0.417000        1.0080           0

         2 !NBOND: bonds
         1         2         1         3
";

    #[test]
    fn test_parse_water_psf() {
        let psf = parse_psf_content(SAMPLE, "wat.psf").unwrap();
        assert_eq!(psf.topology.n_atoms(), 3);
        assert_eq!(psf.topology.atoms[0].name, "OH2");
        assert_eq!(psf.topology.atoms[0].residue_name, "TIP3");
        assert_eq!(psf.topology.atoms[0].chain_id, "WT1");
        assert_eq!(psf.topology.n_residues(), 1);
    }

    #[test]
    fn test_charges_and_masses() {
        let psf = parse_psf_content(SAMPLE, "wat.psf").unwrap();
        assert!((psf.charges[0] + 0.834).abs() < 1e-9);
        assert!((psf.masses[0] - 15.9994).abs() < 1e-9);
    }

    #[test]
    fn test_bonds_one_based() {
        let psf = parse_psf_content(SAMPLE, "wat.psf").unwrap();
        assert_eq!(
            psf.topology.bonds,
            vec![Bond { i: 0, j: 1 }, Bond { i: 0, j: 2 }]
        );
    }

    #[test]
    fn test_missing_header_is_parse_error() {
        assert!(parse_psf_content("3 !NATOM\n", "bad.psf").is_err());
    }

    #[test]
    fn test_truncated_natom_is_parse_error() {
        let content = "PSF\n\n         5 !NATOM\n         1 A 1 ALA N NT 0.0 14.0 0\n";
        assert!(parse_psf_content(content, "bad.psf").is_err());
    }
}
