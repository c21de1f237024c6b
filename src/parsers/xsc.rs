//! # NAMD XSC 格式解析器
//!
//! 解析扩展体系配置文件 (.xsc)：一行字段名表头、一行数值，
//! 按位置绑定字段名与数值，取 a_x / b_y / c_z 构造对角盒子 (Å)。
//! 三斜盒子不在支持范围内。
//!
//! ## 文件样例
//! ```text
//! # NAMD extended system configuration output
//! #$LABELS step a_x a_y a_z b_x b_y b_z c_x c_y c_z o_x o_y o_z
//! 1000 62.2 0 0 0 62.2 0 0 0 62.2 0 0 0
//! ```
//!
//! ## 依赖关系
//! - 被 `loaders/box_vectors.rs` 使用
//! - 使用 `models/quantity.rs`

use crate::error::{MdProtocolError, Result};
use crate::models::quantity::{Quantity, Unit};
use std::fs;
use std::path::Path;

/// 解析 XSC 文件为对角盒子向量
pub fn parse_xsc_file(path: &Path) -> Result<Quantity> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_xsc_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 XSC 格式
pub fn parse_xsc_content(content: &str, origin: &str) -> Result<Quantity> {
    let lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect();

    // 数值行：首个全部字段可解析为 f64 的行
    let value_row = lines
        .iter()
        .position(|line| {
            let mut tokens = line.split_whitespace().peekable();
            tokens.peek().is_some() && tokens.all(|t| t.parse::<f64>().is_ok())
        })
        .ok_or_else(|| parse_error(origin, "no numeric record line found"))?;

    if value_row == 0 {
        return Err(parse_error(origin, "record has no field-name header"));
    }

    // 表头：数值行之前最近的一行，剥掉注释前缀
    let names: Vec<&str> = lines[value_row - 1]
        .split_whitespace()
        .skip_while(|t| t.starts_with('#') || t.starts_with("$"))
        .collect();
    let values: Vec<f64> = lines[value_row]
        .split_whitespace()
        .filter_map(|t| t.parse().ok())
        .collect();

    if names.len() != values.len() {
        return Err(parse_error(
            origin,
            &format!(
                "header names {} fields, record has {} values",
                names.len(),
                values.len()
            ),
        ));
    }

    let lookup = |field: &str| -> Result<f64> {
        names
            .iter()
            .position(|n| *n == field)
            .map(|i| values[i])
            .ok_or_else(|| parse_error(origin, &format!("missing field '{}'", field)))
    };

    let a = lookup("a_x")?;
    let b = lookup("b_y")?;
    let c = lookup("c_z")?;

    Quantity::diagonal_box(a, b, c, Unit::Angstrom)
}

fn parse_error(origin: &str, reason: &str) -> MdProtocolError {
    MdProtocolError::ParseError {
        format: "xsc".to_string(),
        path: origin.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_two_line_record() {
        let content = "step a_x b_y c_z\n0 10.0 20.0 30.0\n";
        let q = parse_xsc_content(content, "min.xsc").unwrap();
        assert_eq!(q.values[0], [10.0, 0.0, 0.0]);
        assert_eq!(q.values[1], [0.0, 20.0, 0.0]);
        assert_eq!(q.values[2], [0.0, 0.0, 30.0]);
        assert_eq!(q.unit, Unit::Angstrom);
    }

    #[test]
    fn test_namd_output_with_comment_lines() {
        let content = "\
# NAMD extended system configuration output
#$LABELS step a_x a_y a_z b_x b_y b_z c_x c_y c_z o_x o_y o_z
1000 62.2 0 0 0 62.2 0 0 0 62.2 0 0 0
";
        let q = parse_xsc_content(content, "namd.xsc").unwrap();
        assert!((q.values[0][0] - 62.2).abs() < 1e-9);
        assert!((q.values[1][1] - 62.2).abs() < 1e-9);
        assert!((q.values[2][2] - 62.2).abs() < 1e-9);
    }

    #[test]
    fn test_missing_field_is_error() {
        let content = "step a_x b_y\n0 10.0 20.0\n";
        assert!(parse_xsc_content(content, "bad.xsc").is_err());
    }

    #[test]
    fn test_header_value_count_mismatch() {
        let content = "step a_x b_y c_z\n0 10.0 20.0\n";
        assert!(parse_xsc_content(content, "bad.xsc").is_err());
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_xsc_content("", "empty.xsc").is_err());
    }
}
