//! # AMBER frcmod 转换器
//!
//! 力场文件列表中出现的 .frcmod (AMBER 参数修正文件) 在使用前
//! 需要规范化为 FFXML。这里解析 MASS / BOND / ANGLE / DIHE /
//! NONBON 分节，转换到 OpenMM 单位制 (nm, kJ/mol)，输出到源文件
//! 旁的 .xml 文件 (已存在则用计数后缀避让)。
//!
//! ## 依赖关系
//! - 被 `loaders/system.rs` 使用
//! - 使用 `utils/naming.rs`

use crate::error::{MdProtocolError, Result};
use crate::utils::naming::available_path;
use std::fs;
use std::path::{Path, PathBuf};

const KCAL_TO_KJ: f64 = 4.184;
const ANGSTROM_TO_NM: f64 = 0.1;

/// frcmod 解析结果 (AMBER 原始单位)
#[derive(Debug, Clone, Default)]
pub struct Frcmod {
    pub title: String,
    /// (类型名, 质量)
    pub masses: Vec<(String, f64)>,
    /// (类型 i, 类型 j, 力常数 kcal/mol/Å², 平衡键长 Å)
    pub bonds: Vec<(String, String, f64, f64)>,
    /// (i, j, k, 力常数 kcal/mol/rad², 平衡角 度)
    pub angles: Vec<(String, String, String, f64, f64)>,
    /// (类型名, Rmin/2 Å, 势阱深度 kcal/mol)
    pub nonbonded: Vec<(String, f64, f64)>,
}

/// 解析 frcmod 并生成 FFXML 文件，返回新文件路径
pub fn create_ffxml_file(path: &Path) -> Result<PathBuf> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let frcmod = parse_frcmod_content(&content, &path.display().to_string())?;
    let xml = to_ffxml_string(&frcmod);

    let target = available_path(&path.with_extension("xml"));
    fs::write(&target, xml).map_err(|e| MdProtocolError::FileWriteError {
        path: target.display().to_string(),
        source: e,
    })?;
    Ok(target)
}

/// 从字符串内容解析 frcmod
pub fn parse_frcmod_content(content: &str, origin: &str) -> Result<Frcmod> {
    let mut frcmod = Frcmod::default();
    let mut section = "";

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim_end();
        if idx == 0 {
            frcmod.title = line.trim().to_string();
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            // 空行结束当前分节
            section = "";
            continue;
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "MASS" => {
                section = "MASS";
                continue;
            }
            "BOND" => {
                section = "BOND";
                continue;
            }
            "ANGLE" | "ANGL" => {
                section = "ANGLE";
                continue;
            }
            "DIHE" | "IMPROPER" | "IMPR" | "HBON" => {
                // 二面角与氢键分节目前不进入 FFXML，读过即可
                section = "SKIP";
                continue;
            }
            "NONBON" | "NONB" => {
                section = "NONBON";
                continue;
            }
            _ => {}
        }

        match section {
            // 键/角分节的原子类型用 '-' 连接: "C -N " 或 "C -N -CT"
            "MASS" => {
                let fields: Vec<&str> = trimmed.split_whitespace().collect();
                if fields.len() >= 2 {
                    if let Ok(mass) = fields[1].parse() {
                        frcmod.masses.push((fields[0].to_string(), mass));
                    }
                }
            }
            "BOND" => {
                if let Some((classes, numbers)) = split_dashed(trimmed, 2) {
                    if let [Ok(k), Ok(r0)] =
                        [numbers[0].parse::<f64>(), numbers[1].parse::<f64>()]
                    {
                        frcmod
                            .bonds
                            .push((classes[0].clone(), classes[1].clone(), k, r0));
                    }
                }
            }
            "ANGLE" => {
                if let Some((classes, numbers)) = split_dashed(trimmed, 3) {
                    if let [Ok(k), Ok(theta0)] =
                        [numbers[0].parse::<f64>(), numbers[1].parse::<f64>()]
                    {
                        frcmod.angles.push((
                            classes[0].clone(),
                            classes[1].clone(),
                            classes[2].clone(),
                            k,
                            theta0,
                        ));
                    }
                }
            }
            "NONBON" => {
                let fields: Vec<&str> = trimmed.split_whitespace().collect();
                if fields.len() >= 3 {
                    if let (Ok(rmin_half), Ok(epsilon)) = (fields[1].parse(), fields[2].parse()) {
                        frcmod
                            .nonbonded
                            .push((fields[0].to_string(), rmin_half, epsilon));
                    }
                }
            }
            _ => {}
        }
    }

    if frcmod.masses.is_empty()
        && frcmod.bonds.is_empty()
        && frcmod.angles.is_empty()
        && frcmod.nonbonded.is_empty()
    {
        return Err(MdProtocolError::ParseError {
            format: "frcmod".to_string(),
            path: origin.to_string(),
            reason: "no recognizable sections found".to_string(),
        });
    }

    Ok(frcmod)
}

/// 切开 "C -N -CT  50.0 120.0" 形式的行：前 n 个 '-' 连接的类型 + 数值列
fn split_dashed(line: &str, n_classes: usize) -> Option<(Vec<String>, Vec<String>)> {
    // 类型段宽度固定为每类型 3 字符 (含 '-')
    let class_width = n_classes * 3 - 1;
    if line.len() < class_width {
        return None;
    }
    let (head, tail) = line.split_at(class_width.min(line.len()));
    let classes: Vec<String> = head
        .split('-')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if classes.len() != n_classes {
        return None;
    }
    let numbers: Vec<String> = tail.split_whitespace().map(|s| s.to_string()).collect();
    if numbers.len() < 2 {
        return None;
    }
    Some((classes, numbers))
}

/// 生成 FFXML 字符串 (OpenMM 单位制)
pub fn to_ffxml_string(frcmod: &Frcmod) -> String {
    let mut xml = String::new();
    xml.push_str("<ForceField>\n");

    xml.push_str(" <AtomTypes>\n");
    for (name, mass) in &frcmod.masses {
        let element = element_from_type(name);
        xml.push_str(&format!(
            "  <Type name=\"{0}\" class=\"{0}\" element=\"{1}\" mass=\"{2}\"/>\n",
            name, element, mass
        ));
    }
    xml.push_str(" </AtomTypes>\n");

    if !frcmod.bonds.is_empty() {
        xml.push_str(" <HarmonicBondForce>\n");
        for (i, j, k, r0) in &frcmod.bonds {
            // OpenMM: E = k/2 (r-r0)², AMBER: E = K (r-r0)²
            let k_omm = 2.0 * k * KCAL_TO_KJ / (ANGSTROM_TO_NM * ANGSTROM_TO_NM);
            let r0_nm = r0 * ANGSTROM_TO_NM;
            xml.push_str(&format!(
                "  <Bond class1=\"{}\" class2=\"{}\" length=\"{:.6}\" k=\"{:.2}\"/>\n",
                i, j, r0_nm, k_omm
            ));
        }
        xml.push_str(" </HarmonicBondForce>\n");
    }

    if !frcmod.angles.is_empty() {
        xml.push_str(" <HarmonicAngleForce>\n");
        for (i, j, k_class, k, theta0) in &frcmod.angles {
            let k_omm = 2.0 * k * KCAL_TO_KJ;
            let theta_rad = theta0.to_radians();
            xml.push_str(&format!(
                "  <Angle class1=\"{}\" class2=\"{}\" class3=\"{}\" angle=\"{:.8}\" k=\"{:.2}\"/>\n",
                i, j, k_class, theta_rad, k_omm
            ));
        }
        xml.push_str(" </HarmonicAngleForce>\n");
    }

    if !frcmod.nonbonded.is_empty() {
        xml.push_str(" <NonbondedForce coulomb14scale=\"0.8333333333\" lj14scale=\"0.5\">\n");
        for (name, rmin_half, epsilon) in &frcmod.nonbonded {
            // sigma = 2 * Rmin/2 * 2^(-1/6)
            let sigma = 2.0 * rmin_half * ANGSTROM_TO_NM * 2f64.powf(-1.0 / 6.0);
            let eps_kj = epsilon.abs() * KCAL_TO_KJ;
            xml.push_str(&format!(
                "  <Atom type=\"{}\" charge=\"0\" sigma=\"{:.8}\" epsilon=\"{:.6}\"/>\n",
                name, sigma, eps_kj
            ));
        }
        xml.push_str(" </NonbondedForce>\n");
    }

    xml.push_str("</ForceField>\n");
    xml
}

/// 从 AMBER 原子类型名猜元素 (gaff 类型多为小写)
fn element_from_type(name: &str) -> String {
    crate::models::topology::element_from_name(&name.to_ascii_uppercase())
}
