//! # 序列化状态 XML 解析器
//!
//! 解析 OpenMM 风格的 State XML 检查点：`<Positions>`、
//! `<Velocities>`、`<PeriodicBoxVectors>` 三段均可缺省。
//! 数值单位为 nm 和 nm/ps。
//!
//! ## 文件样例
//! ```text
//! <State time="0" type="State" version="1">
//!   <PeriodicBoxVectors>
//!     <A x="6.2" y="0" z="0"/>
//!     <B x="0" y="6.2" z="0"/>
//!     <C x="0" y="0" z="6.2"/>
//!   </PeriodicBoxVectors>
//!   <Positions>
//!     <Position x="1.1" y="2.2" z="3.3"/>
//!   </Positions>
//! </State>
//! ```
//!
//! ## 依赖关系
//! - 被 `loaders/restart.rs` 使用
//! - 使用 `quick-xml`

use crate::error::{MdProtocolError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// State XML 解析结果 (nm / nm/ps)
#[derive(Debug, Clone, Default)]
pub struct StateXml {
    /// 模拟时间 (ps)
    pub time: Option<f64>,
    pub positions: Option<Vec<[f64; 3]>>,
    pub velocities: Option<Vec<[f64; 3]>>,
    pub box_vectors: Option<[[f64; 3]; 3]>,
}

/// 解析 State XML 文件
pub fn parse_state_xml_file(path: &Path) -> Result<StateXml> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_state_xml_content(&content, &path.display().to_string())
}

/// 从字符串内容解析
pub fn parse_state_xml_content(content: &str, origin: &str) -> Result<StateXml> {
    let mut reader = Reader::from_reader(content.as_bytes());
    let mut state = StateXml::default();
    let mut buf = Vec::new();
    let mut saw_state_element = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"State" => {
                    saw_state_element = true;
                    state.time = attribute(e, b"time").and_then(|s| s.parse().ok());
                }
                b"Positions" => {
                    state.positions =
                        Some(read_vector_list(&mut reader, b"Positions", b"Position", origin)?);
                }
                b"Velocities" => {
                    state.velocities = Some(read_vector_list(
                        &mut reader,
                        b"Velocities",
                        b"Velocity",
                        origin,
                    )?);
                }
                b"PeriodicBoxVectors" => {
                    state.box_vectors = Some(read_box_vectors(&mut reader, origin)?);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(origin, &e.to_string())),
        }
        buf.clear();
    }

    if !saw_state_element {
        return Err(xml_error(origin, "no <State> element found"));
    }

    Ok(state)
}

/// 读取 `<Position x y z/>` 之类的向量列表直到父节点结束
fn read_vector_list<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    parent: &[u8],
    item: &[u8],
    origin: &str,
) -> Result<Vec<[f64; 3]>> {
    let mut rows = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == item => {
                rows.push(xyz_attributes(e, origin)?);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == parent => break,
            Ok(Event::Eof) => {
                return Err(xml_error(origin, "unexpected end of file inside vector list"))
            }
            Ok(_) => {}
            Err(e) => return Err(xml_error(origin, &e.to_string())),
        }
        buf.clear();
    }

    Ok(rows)
}

/// 读取 `<A/> <B/> <C/>` 三行盒子向量
fn read_box_vectors<R: std::io::BufRead>(
    reader: &mut Reader<R>,
    origin: &str,
) -> Result<[[f64; 3]; 3]> {
    let mut rows: [Option<[f64; 3]>; 3] = [None, None, None];
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                let slot = match e.name().as_ref() {
                    b"A" => Some(0),
                    b"B" => Some(1),
                    b"C" => Some(2),
                    _ => None,
                };
                if let Some(i) = slot {
                    rows[i] = Some(xyz_attributes(e, origin)?);
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"PeriodicBoxVectors" => break,
            Ok(Event::Eof) => {
                return Err(xml_error(origin, "unexpected end of file inside box vectors"))
            }
            Ok(_) => {}
            Err(e) => return Err(xml_error(origin, &e.to_string())),
        }
        buf.clear();
    }

    match rows {
        [Some(a), Some(b), Some(c)] => Ok([a, b, c]),
        _ => Err(xml_error(origin, "PeriodicBoxVectors missing A, B or C")),
    }
}

/// 提取 x/y/z 三个属性
fn xyz_attributes(e: &BytesStart<'_>, origin: &str) -> Result<[f64; 3]> {
    let x = numeric_attribute(e, b"x", origin)?;
    let y = numeric_attribute(e, b"y", origin)?;
    let z = numeric_attribute(e, b"z", origin)?;
    Ok([x, y, z])
}

fn numeric_attribute(e: &BytesStart<'_>, key: &[u8], origin: &str) -> Result<f64> {
    attribute(e, key)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            xml_error(
                origin,
                &format!(
                    "element <{}> missing numeric attribute '{}'",
                    String::from_utf8_lossy(e.name().as_ref()),
                    String::from_utf8_lossy(key)
                ),
            )
        })
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn xml_error(origin: &str, reason: &str) -> MdProtocolError {
    MdProtocolError::ParseError {
        format: "state xml".to_string(),
        path: origin.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"<?xml version="1.0" ?>
<State time="25.5" type="State" version="1">
  <PeriodicBoxVectors>
    <A x="6.2" y="0" z="0"/>
    <B x="0" y="6.2" z="0"/>
    <C x="0" y="0" z="6.2"/>
  </PeriodicBoxVectors>
  <Positions>
    <Position x="1.1" y="2.2" z="3.3"/>
    <Position x="4.4" y="5.5" z="6.6"/>
  </Positions>
  <Velocities>
    <Velocity x="0.1" y="0.2" z="0.3"/>
    <Velocity x="0.4" y="0.5" z="0.6"/>
  </Velocities>
</State>
"#;

    #[test]
    fn test_full_state() {
        let state = parse_state_xml_content(FULL, "full.xml").unwrap();
        assert_eq!(state.time, Some(25.5));
        let pos = state.positions.unwrap();
        assert_eq!(pos.len(), 2);
        assert!((pos[1][2] - 6.6).abs() < 1e-12);
        let vel = state.velocities.unwrap();
        assert!((vel[0][0] - 0.1).abs() < 1e-12);
        let bv = state.box_vectors.unwrap();
        assert!((bv[2][2] - 6.2).abs() < 1e-12);
    }

    #[test]
    fn test_positions_only_state() {
        let content = r#"<State><Positions><Position x="1" y="2" z="3"/></Positions></State>"#;
        let state = parse_state_xml_content(content, "pos.xml").unwrap();
        assert!(state.positions.is_some());
        assert!(state.velocities.is_none());
        assert!(state.box_vectors.is_none());
    }

    #[test]
    fn test_incomplete_box_is_error() {
        let content = r#"<State><PeriodicBoxVectors><A x="1" y="0" z="0"/></PeriodicBoxVectors></State>"#;
        assert!(parse_state_xml_content(content, "bad.xml").is_err());
    }

    #[test]
    fn test_missing_attribute_is_error() {
        let content = r#"<State><Positions><Position x="1" y="2"/></Positions></State>"#;
        assert!(parse_state_xml_content(content, "bad.xml").is_err());
    }

    #[test]
    fn test_not_a_state_file() {
        assert!(parse_state_xml_content("<Other/>", "bad.xml").is_err());
    }
}
