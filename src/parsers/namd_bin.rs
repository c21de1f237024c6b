//! # NAMD 二进制坐标/速度解析器
//!
//! 解析 NAMD 的 .coor (坐标, Å) 和 .vel (速度, Å/ps) 二进制文件。
//! 布局：小端 i32 原子数 + natom*3 个小端 f64。
//!
//! ## 依赖关系
//! - 被 `loaders/positions.rs`, `loaders/velocities.rs` 使用

use crate::error::{MdProtocolError, Result};
use std::fs;
use std::path::Path;

/// 解析 NAMD 二进制文件
pub fn parse_namd_bin_file(path: &Path) -> Result<Vec<[f64; 3]>> {
    let data = fs::read(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_namd_bin_bytes(&data, &path.display().to_string())
}

/// 从字节切片解析
pub fn parse_namd_bin_bytes(data: &[u8], origin: &str) -> Result<Vec<[f64; 3]>> {
    if data.len() < 4 {
        return Err(parse_error(origin, "file shorter than the atom count header"));
    }

    let n_atoms = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if n_atoms <= 0 {
        return Err(parse_error(
            origin,
            &format!("invalid atom count {}", n_atoms),
        ));
    }
    let n_atoms = n_atoms as usize;

    let expected = 4 + n_atoms * 3 * 8;
    if data.len() != expected {
        return Err(parse_error(
            origin,
            &format!(
                "expected {} bytes for {} atoms, file has {}",
                expected,
                n_atoms,
                data.len()
            ),
        ));
    }

    let mut rows = Vec::with_capacity(n_atoms);
    let mut offset = 4;
    for _ in 0..n_atoms {
        let mut row = [0.0f64; 3];
        for item in row.iter_mut() {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&data[offset..offset + 8]);
            *item = f64::from_le_bytes(buf);
            offset += 8;
        }
        rows.push(row);
    }

    Ok(rows)
}

fn parse_error(origin: &str, reason: &str) -> MdProtocolError {
    MdProtocolError::ParseError {
        format: "namdbin".to_string(),
        path: origin.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(rows: &[[f64; 3]]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&(rows.len() as i32).to_le_bytes());
        for row in rows {
            for v in row {
                data.extend_from_slice(&v.to_le_bytes());
            }
        }
        data
    }

    #[test]
    fn test_parse_two_atoms() {
        let rows = vec![[1.5, -2.0, 3.25], [0.0, 10.0, -7.5]];
        let parsed = parse_namd_bin_bytes(&encode(&rows), "a.coor").unwrap();
        assert_eq!(parsed, rows);
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = encode(&[[1.0, 2.0, 3.0]]);
        data.truncate(data.len() - 1);
        assert!(parse_namd_bin_bytes(&data, "a.coor").is_err());
    }

    #[test]
    fn test_negative_atom_count() {
        let data = (-1i32).to_le_bytes().to_vec();
        assert!(parse_namd_bin_bytes(&data, "a.coor").is_err());
    }

    #[test]
    fn test_too_short_header() {
        assert!(parse_namd_bin_bytes(&[0, 1], "a.coor").is_err());
    }
}
