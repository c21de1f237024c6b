//! # FFXML 力场文件解析器
//!
//! 解析 OpenMM 风格的力场 XML：原子类型、残基模板、
//! 谐波键/角、周期性二面角与非键参数段。
//!
//! ## 依赖关系
//! - 被 `loaders/system.rs` 使用
//! - 使用 `models/forcefield.rs`, `quick-xml`

use crate::error::{MdProtocolError, Result};
use crate::models::forcefield::{AtomType, ForceField};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// 解析 FFXML 文件
pub fn parse_ffxml_file(path: &Path) -> Result<ForceField> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut ff = parse_ffxml_content(&content, &path.display().to_string())?;
    ff.sources = vec![path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("forcefield")
        .to_string()];
    Ok(ff)
}

/// 从字符串内容解析 FFXML
pub fn parse_ffxml_content(content: &str, origin: &str) -> Result<ForceField> {
    let mut reader = Reader::from_reader(content.as_bytes());
    let mut ff = ForceField::new();
    let mut buf = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"ForceField" => saw_root = true,
                b"AtomTypes" => parse_atom_types(&mut reader, &mut ff, origin)?,
                b"Residues" => parse_residues(&mut reader, &mut ff, origin)?,
                b"HarmonicBondForce" => {
                    ff.n_bond_params += count_entries(&mut reader, b"HarmonicBondForce", origin)?;
                }
                b"HarmonicAngleForce" => {
                    ff.n_angle_params += count_entries(&mut reader, b"HarmonicAngleForce", origin)?;
                }
                b"PeriodicTorsionForce" => {
                    ff.n_torsion_params +=
                        count_entries(&mut reader, b"PeriodicTorsionForce", origin)?;
                }
                b"NonbondedForce" => {
                    ff.n_nonbonded_params += count_entries(&mut reader, b"NonbondedForce", origin)?;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(origin, &e.to_string())),
        }
        buf.clear();
    }

    if !saw_root {
        return Err(xml_error(origin, "no <ForceField> root element found"));
    }

    Ok(ff)
}

/// 读取 `<AtomTypes>` 段
fn parse_atom_types<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    ff: &mut ForceField,
    origin: &str,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"Type" => {
                ff.atom_types.push(AtomType {
                    name: attribute(e, b"name").unwrap_or_default(),
                    class: attribute(e, b"class").unwrap_or_default(),
                    element: attribute(e, b"element").unwrap_or_default(),
                    mass: attribute(e, b"mass")
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| xml_error(origin, "atom type missing mass"))?,
                });
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"AtomTypes" => break,
            Ok(Event::Eof) => return Err(xml_error(origin, "unterminated <AtomTypes>")),
            Ok(_) => {}
            Err(e) => return Err(xml_error(origin, &e.to_string())),
        }
        buf.clear();
    }
    Ok(())
}

/// 读取 `<Residues>` 段，只记录模板名
fn parse_residues<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    ff: &mut ForceField,
    origin: &str,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Residue" =>
            {
                if let Some(name) = attribute(e, b"name") {
                    ff.residue_templates.push(name);
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"Residues" => break,
            Ok(Event::Eof) => return Err(xml_error(origin, "unterminated <Residues>")),
            Ok(_) => {}
            Err(e) => return Err(xml_error(origin, &e.to_string())),
        }
        buf.clear();
    }
    Ok(())
}

/// 数一个力场段内的参数条目 (子元素个数，忽略嵌套层级以下的内容)
fn count_entries<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    section: &[u8],
    origin: &str,
) -> Result<usize> {
    let mut count = 0usize;
    let mut depth = 0usize;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(_)) if depth == 0 => count += 1,
            Ok(Event::Start(_)) => {
                if depth == 0 {
                    count += 1;
                }
                depth += 1;
            }
            Ok(Event::End(ref e)) if depth == 0 && e.name().as_ref() == section => break,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => {
                return Err(xml_error(
                    origin,
                    &format!(
                        "unterminated <{}>",
                        String::from_utf8_lossy(section)
                    ),
                ))
            }
            Ok(_) => {}
            Err(e) => return Err(xml_error(origin, &e.to_string())),
        }
        buf.clear();
    }
    Ok(count)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn xml_error(origin: &str, reason: &str) -> MdProtocolError {
    MdProtocolError::ParseError {
        format: "ffxml".to_string(),
        path: origin.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<ForceField>
 <AtomTypes>
  <Type name="tip3p-O" class="OW" element="O" mass="15.99943"/>
  <Type name="tip3p-H" class="HW" element="H" mass="1.007947"/>
 </AtomTypes>
 <Residues>
  <Residue name="HOH">
   <Atom name="O" type="tip3p-O"/>
   <Atom name="H1" type="tip3p-H"/>
   <Atom name="H2" type="tip3p-H"/>
   <Bond atomName1="O" atomName2="H1"/>
   <Bond atomName1="O" atomName2="H2"/>
  </Residue>
 </Residues>
 <HarmonicBondForce>
  <Bond class1="OW" class2="HW" length="0.09572" k="462750.4"/>
 </HarmonicBondForce>
 <HarmonicAngleForce>
  <Angle class1="HW" class2="OW" class3="HW" angle="1.82421813418" k="836.8"/>
 </HarmonicAngleForce>
 <NonbondedForce coulomb14scale="0.833333" lj14scale="0.5">
  <Atom type="tip3p-O" charge="-0.834" sigma="0.31507524065751241" epsilon="0.635968"/>
  <Atom type="tip3p-H" charge="0.417" sigma="1" epsilon="0"/>
 </NonbondedForce>
</ForceField>
"#;

    #[test]
    fn test_atom_types() {
        let ff = parse_ffxml_content(SAMPLE, "tip3p.xml").unwrap();
        assert_eq!(ff.n_atom_types(), 2);
        assert_eq!(ff.atom_types[0].name, "tip3p-O");
        assert_eq!(ff.atom_types[0].element, "O");
        assert!((ff.atom_types[1].mass - 1.007947).abs() < 1e-9);
    }

    #[test]
    fn test_residue_templates() {
        let ff = parse_ffxml_content(SAMPLE, "tip3p.xml").unwrap();
        assert_eq!(ff.residue_templates, vec!["HOH".to_string()]);
    }

    #[test]
    fn test_parameter_counts() {
        let ff = parse_ffxml_content(SAMPLE, "tip3p.xml").unwrap();
        assert_eq!(ff.n_bond_params, 1);
        assert_eq!(ff.n_angle_params, 1);
        assert_eq!(ff.n_nonbonded_params, 2);
    }

    #[test]
    fn test_missing_root_is_error() {
        assert!(parse_ffxml_content("<NotAForceField/>", "bad.xml").is_err());
    }
}
