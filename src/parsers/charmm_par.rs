//! # CHARMM 参数文件解析器
//!
//! 解析 CHARMM .par / .str 参数文件的 BONDS / ANGLES / DIHEDRALS /
//! NONBONDED 分节。`!` 之后为注释，`*` 开头为标题行。.str 文件中
//! `read para card` 之类的包装行会被安全跳过。
//!
//! ## 依赖关系
//! - 被 `loaders/system.rs` 使用
//! - 使用 `models/forcefield.rs`

use crate::error::{MdProtocolError, Result};
use crate::models::forcefield::{
    CharmmAngleParam, CharmmBondParam, CharmmDihedralParam, CharmmNonbondedParam,
    CharmmParameterSet,
};
use std::fs;
use std::path::Path;

/// 当前所在分节
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Bonds,
    Angles,
    Dihedrals,
    Nonbonded,
    Skipped,
}

/// 解析 CHARMM 参数文件
pub fn parse_charmm_par_file(path: &Path) -> Result<CharmmParameterSet> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut params = parse_charmm_par_content(&content, &path.display().to_string())?;
    params.sources = vec![path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("parameters")
        .to_string()];
    Ok(params)
}

/// 从字符串内容解析
pub fn parse_charmm_par_content(content: &str, origin: &str) -> Result<CharmmParameterSet> {
    let mut params = CharmmParameterSet::new();
    let mut section = Section::None;

    for raw in content.lines() {
        // 去掉行内注释
        let line = raw.split('!').next().unwrap_or("").trim_end();
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('*') {
            continue;
        }

        let keyword = trimmed
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_uppercase();
        match keyword.as_str() {
            "BONDS" => {
                section = Section::Bonds;
                continue;
            }
            "ANGLES" | "THETAS" => {
                section = Section::Angles;
                continue;
            }
            "DIHEDRALS" | "PHI" => {
                section = Section::Dihedrals;
                continue;
            }
            "NONBONDED" => {
                section = Section::Nonbonded;
                continue;
            }
            "IMPROPER" | "IMPROPERS" | "CMAP" | "NBFIX" | "HBOND" | "ATOMS" | "MASS" => {
                section = Section::Skipped;
                continue;
            }
            "END" | "RETURN" => {
                section = Section::None;
                continue;
            }
            _ => {}
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match section {
            Section::Bonds => {
                if let [i, j, k, r0] = fields[..] {
                    if let (Ok(k), Ok(r0)) = (k.parse(), r0.parse()) {
                        params.bonds.push(CharmmBondParam {
                            class_i: i.to_string(),
                            class_j: j.to_string(),
                            k,
                            r0,
                        });
                    }
                }
            }
            Section::Angles => {
                // 角参数后可跟 Urey-Bradley 两列，取前五列
                if fields.len() >= 5 {
                    if let (Ok(k), Ok(theta0)) = (fields[3].parse(), fields[4].parse()) {
                        params.angles.push(CharmmAngleParam {
                            class_i: fields[0].to_string(),
                            class_j: fields[1].to_string(),
                            class_k: fields[2].to_string(),
                            k,
                            theta0,
                        });
                    }
                }
            }
            Section::Dihedrals => {
                if fields.len() >= 7 {
                    let parsed: (
                        std::result::Result<f64, _>,
                        std::result::Result<i32, _>,
                        std::result::Result<f64, _>,
                    ) = (fields[4].parse(), fields[5].parse(), fields[6].parse());
                    if let (Ok(k), Ok(multiplicity), Ok(phase)) = parsed {
                        params.dihedrals.push(CharmmDihedralParam {
                            classes: [
                                fields[0].to_string(),
                                fields[1].to_string(),
                                fields[2].to_string(),
                                fields[3].to_string(),
                            ],
                            k,
                            multiplicity,
                            phase,
                        });
                    }
                }
            }
            Section::Nonbonded => {
                // 条目形如: CLASS ignored epsilon Rmin/2 [1-4 项]
                // 截断半径等设置行的第 3 列不是数值，借此区分
                if fields.len() >= 4 {
                    let numeric = (
                        fields[1].parse::<f64>(),
                        fields[2].parse::<f64>(),
                        fields[3].parse::<f64>(),
                    );
                    if let (Ok(_), Ok(epsilon), Ok(rmin_half)) = numeric {
                        params.nonbonded.push(CharmmNonbondedParam {
                            class: fields[0].to_string(),
                            epsilon,
                            rmin_half,
                        });
                    }
                }
            }
            Section::None | Section::Skipped => {}
        }
    }

    if params.is_empty() {
        return Err(MdProtocolError::ParseError {
            format: "charmm parameters".to_string(),
            path: origin.to_string(),
            reason: "no parameter entries found".to_string(),
        });
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
* Toy CHARMM parameter file
*

BONDS
!V(bond) = Kb(b - b0)**2
OT   HT    450.000     0.9572 ! TIP3P geometry
CT1  CT2   222.500     1.5380

ANGLES
HT   OT   HT     55.000   104.5200 ! TIP3P
HA   CT1  CT2    34.600   110.10    22.53   2.179 ! with Urey-Bradley

DIHEDRALS
X    CT1  CT2  X        0.2000  3     0.00

NONBONDED nbxmod  5 atom cdiel fshift vatom vdistance vfswitch -
cutnb 14.0 ctofnb 12.0 ctonnb 10.0 eps 1.0 e14fac 1.0 wmin 1.5
OT     0.000000  -0.152100     1.768200
HT     0.000000  -0.046000     0.224500

END
";

    #[test]
    fn test_bonds() {
        let params = parse_charmm_par_content(SAMPLE, "toy.par").unwrap();
        assert_eq!(params.bonds.len(), 2);
        assert_eq!(params.bonds[0].class_i, "OT");
        assert!((params.bonds[0].k - 450.0).abs() < 1e-9);
        assert!((params.bonds[0].r0 - 0.9572).abs() < 1e-9);
    }

    #[test]
    fn test_angles_with_urey_bradley() {
        let params = parse_charmm_par_content(SAMPLE, "toy.par").unwrap();
        assert_eq!(params.angles.len(), 2);
        assert!((params.angles[1].theta0 - 110.10).abs() < 1e-9);
    }

    #[test]
    fn test_dihedrals() {
        let params = parse_charmm_par_content(SAMPLE, "toy.par").unwrap();
        assert_eq!(params.dihedrals.len(), 1);
        assert_eq!(params.dihedrals[0].multiplicity, 3);
    }

    #[test]
    fn test_nonbonded_skips_settings_line() {
        let params = parse_charmm_par_content(SAMPLE, "toy.par").unwrap();
        assert_eq!(params.nonbonded.len(), 2);
        assert_eq!(params.nonbonded[0].class, "OT");
        assert!((params.nonbonded[0].epsilon + 0.1521).abs() < 1e-9);
    }

    #[test]
    fn test_empty_file_is_error() {
        assert!(parse_charmm_par_content("* nothing\n", "empty.par").is_err());
    }
}
