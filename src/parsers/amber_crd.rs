//! # AMBER 坐标/重启动文件解析器
//!
//! 解析 inpcrd/crd (坐标) 与 rst/restart (重启动) 文本格式。
//! 两者共享同一布局：标题行、原子数行 (重启动文件附带时间)、
//! 12.7f 固定宽度坐标值 (每行 6 个)；重启动文件之后可跟速度段
//! 和盒子行。
//!
//! 速度/盒子是否存在按行结构判定：
//! - 坐标之后没有数据行        → 仅坐标
//! - 与坐标段等行数、等值数    → 坐标 + 速度
//! - 再多一个 3/6 值的末行     → 附带盒子行
//! - 单独一个 3/6 值的数据行   → 仅盒子
//!
//! 1-2 原子时速度段只占一行，与 6 值盒子行无法区分；此时按
//! 重启动文件的惯例读作速度。段落起始但数值不足视为解析错误，
//! 绝不当作"缺失"。
//!
//! ## 依赖关系
//! - 被 `loaders/positions.rs`, `loaders/restart.rs` 使用

use crate::error::{MdProtocolError, Result};
use std::fs;
use std::path::Path;

/// AMBER 速度单位换算：文件内速度以 Å/(1/20.455 ps) 存储
pub const AMBER_VELOCITY_SCALE: f64 = 20.455;

/// 固定宽度字段宽度 (F12.7)
const FIELD_WIDTH: usize = 12;

/// 解析结果，长度单位 Å，速度单位 Å/ps
#[derive(Debug, Clone)]
pub struct AmberCrd {
    pub n_atoms: usize,
    pub positions: Vec<[f64; 3]>,
    pub velocities: Option<Vec<[f64; 3]>>,
    /// 盒子边长 (a, b, c)，Å
    pub box_lengths: Option<[f64; 3]>,
    /// 重启动文件携带的模拟时间 (ps)
    pub time: Option<f64>,
}

/// 解析 inpcrd/rst7 文件
pub fn parse_amber_crd_file(path: &Path) -> Result<AmberCrd> {
    let content = fs::read_to_string(path).map_err(|e| MdProtocolError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_amber_crd_content(&content, &path.display().to_string())
}

/// 从字符串内容解析
pub fn parse_amber_crd_content(content: &str, origin: &str) -> Result<AmberCrd> {
    let mut lines = content.lines();

    // 标题行
    lines
        .next()
        .ok_or_else(|| parse_error(origin, "empty file"))?;

    // 原子数行: "natom [time]"
    let header = lines
        .next()
        .ok_or_else(|| parse_error(origin, "missing atom count line"))?;
    let mut header_fields = header.split_whitespace();
    let n_atoms: usize = header_fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| parse_error(origin, "invalid atom count"))?;
    let time: Option<f64> = header_fields.next().and_then(|s| s.parse().ok());

    if n_atoms == 0 {
        return Err(parse_error(origin, "atom count is zero"));
    }

    // 逐行读取数值，保留行边界 (固定宽度优先，空白分隔兜底)
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_line_values(line, origin)?);
    }

    // 坐标段：整行消费直到恰好 natom*3 个值
    let n_pos = n_atoms * 3;
    let mut flat: Vec<f64> = Vec::with_capacity(n_pos);
    let mut pos_lines = 0usize;
    for row in &rows {
        if flat.len() == n_pos {
            break;
        }
        if flat.len() + row.len() > n_pos {
            return Err(parse_error(
                origin,
                "coordinate section does not end at a line boundary",
            ));
        }
        flat.extend(row);
        pos_lines += 1;
    }
    if flat.len() < n_pos {
        return Err(parse_error(
            origin,
            &format!("expected {} coordinate values, found {}", n_pos, flat.len()),
        ));
    }

    // 速度段与坐标段行数/值数一致；盒子是末尾单独的 3/6 值行
    let rest = &rows[pos_lines..];
    let rest_values: usize = rest.iter().map(|r| r.len()).sum();
    let last_len = rest.last().map(|r| r.len()).unwrap_or(0);

    let (velocity_rows, box_row): (Option<&[Vec<f64>]>, Option<&Vec<f64>>) = if rest.is_empty() {
        (None, None)
    } else if rest.len() == pos_lines + 1
        && rest_values == n_pos + last_len
        && (last_len == 3 || last_len == 6)
    {
        (Some(&rest[..rest.len() - 1]), rest.last())
    } else if rest.len() == pos_lines && rest_values == n_pos {
        // 1-2 原子时单行速度段与 6 值盒子行同形，优先读作速度
        (Some(rest), None)
    } else if rest.len() == 1 && (last_len == 3 || last_len == 6) {
        (None, rest.last())
    } else {
        return Err(parse_error(
            origin,
            &format!(
                "unexpected layout after coordinates: {} values in {} lines for {} atoms",
                rest_values,
                rest.len(),
                n_atoms
            ),
        ));
    };

    let positions: Vec<[f64; 3]> = flat
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    let velocities = velocity_rows.map(|section| {
        section
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<f64>>()
            .chunks_exact(3)
            .map(|c| {
                [
                    c[0] * AMBER_VELOCITY_SCALE,
                    c[1] * AMBER_VELOCITY_SCALE,
                    c[2] * AMBER_VELOCITY_SCALE,
                ]
            })
            .collect()
    });

    // 盒子行: a b c [alpha beta gamma]，只取边长
    let box_lengths = box_row.map(|row| [row[0], row[1], row[2]]);

    Ok(AmberCrd {
        n_atoms,
        positions,
        velocities,
        box_lengths,
        time,
    })
}

/// 解析一行 12 字符宽的数值字段；兼容空白分隔的写法
fn parse_line_values(line: &str, origin: &str) -> Result<Vec<f64>> {
    // 固定宽度模式：行长是 12 的倍数且切出的字段都能解析
    let bytes = line.as_bytes();
    if bytes.len() % FIELD_WIDTH == 0 {
        let mut parsed = Vec::with_capacity(bytes.len() / FIELD_WIDTH);
        let mut ok = true;
        for chunk in bytes.chunks(FIELD_WIDTH) {
            let field = std::str::from_utf8(chunk).unwrap_or("").trim();
            if field.is_empty() {
                continue;
            }
            match field.parse::<f64>() {
                Ok(v) => parsed.push(v),
                Err(_) => {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            return Ok(parsed);
        }
    }

    // 空白分隔兜底
    let mut values = Vec::new();
    for token in line.split_whitespace() {
        let v: f64 = token
            .parse()
            .map_err(|_| parse_error(origin, &format!("invalid numeric field '{}'", token)))?;
        values.push(v);
    }
    Ok(values)
}

fn parse_error(origin: &str, reason: &str) -> MdProtocolError {
    MdProtocolError::ParseError {
        format: "inpcrd/rst7".to_string(),
        path: origin.to_string(),
        reason: reason.to_string(),
    }
}
