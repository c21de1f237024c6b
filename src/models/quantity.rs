//! # 物理量数据模型
//!
//! 定义带单位标签的坐标数组 `Quantity`，用于位置、速度和盒子向量。
//! 单位携带量纲信息（长度 / 速度），容器赋值时据此做快速校验。
//!
//! ## 依赖关系
//! - 被 `models/container.rs`、`loaders/`、`parsers/` 使用
//! - 无外部模块依赖

use crate::error::{MdProtocolError, Result};
use serde::{Deserialize, Serialize};

/// 量纲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    /// 长度（位置、盒子向量）
    Length,
    /// 速度（长度/时间）
    Velocity,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Length => write!(f, "length"),
            Dimension::Velocity => write!(f, "length/time"),
        }
    }
}

/// 支持的单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Angstrom,
    Nanometer,
    AngstromPerPicosecond,
    NanometerPerPicosecond,
}

impl Unit {
    /// 单位所属量纲
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Angstrom | Unit::Nanometer => Dimension::Length,
            Unit::AngstromPerPicosecond | Unit::NanometerPerPicosecond => Dimension::Velocity,
        }
    }

    /// 单位符号
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Angstrom => "A",
            Unit::Nanometer => "nm",
            Unit::AngstromPerPicosecond => "A/ps",
            Unit::NanometerPerPicosecond => "nm/ps",
        }
    }

    /// 换算到基准单位（长度: Å, 速度: Å/ps）的因子
    fn to_base(&self) -> f64 {
        match self {
            Unit::Angstrom | Unit::AngstromPerPicosecond => 1.0,
            Unit::Nanometer | Unit::NanometerPerPicosecond => 10.0,
        }
    }
}

/// 带单位的三维向量数组
///
/// 每行是一个粒子的 [x, y, z]；盒子向量则固定为 3 行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quantity {
    /// 数值，形状 (n, 3)
    pub values: Vec<[f64; 3]>,

    /// 单位
    pub unit: Unit,
}

impl Quantity {
    pub fn new(values: Vec<[f64; 3]>, unit: Unit) -> Self {
        Quantity { values, unit }
    }

    /// 从对角元素构造盒子向量 (3x3，非对角元为 0)
    ///
    /// 单位必须为长度量纲，否则返回 `InvalidArgument`。
    pub fn diagonal_box(a: f64, b: f64, c: f64, unit: Unit) -> Result<Self> {
        if unit.dimension() != Dimension::Length {
            return Err(MdProtocolError::InvalidArgument(format!(
                "Box vectors require a length unit, got {}",
                unit.symbol()
            )));
        }
        Ok(Quantity {
            values: vec![[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]],
            unit,
        })
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 换算到目标单位
    ///
    /// 量纲不同的单位之间不可换算，返回 `InvalidArgument`。
    pub fn to_unit(&self, target: Unit) -> Result<Quantity> {
        if self.unit.dimension() != target.dimension() {
            return Err(MdProtocolError::InvalidArgument(format!(
                "Cannot convert {} to {}",
                self.unit.symbol(),
                target.symbol()
            )));
        }
        let factor = self.unit.to_base() / target.to_base();
        let values = self
            .values
            .iter()
            .map(|v| [v[0] * factor, v[1] * factor, v[2] * factor])
            .collect();
        Ok(Quantity {
            values,
            unit: target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_box() {
        let q = Quantity::diagonal_box(10.0, 20.0, 30.0, Unit::Angstrom).unwrap();
        assert_eq!(q.len(), 3);
        assert_eq!(q.values[0], [10.0, 0.0, 0.0]);
        assert_eq!(q.values[1], [0.0, 20.0, 0.0]);
        assert_eq!(q.values[2], [0.0, 0.0, 30.0]);
    }

    #[test]
    fn test_diagonal_box_rejects_velocity_unit() {
        let result = Quantity::diagonal_box(1.0, 1.0, 1.0, Unit::AngstromPerPicosecond);
        assert!(result.is_err());
    }

    #[test]
    fn test_unit_conversion_angstrom_to_nm() {
        let q = Quantity::new(vec![[10.0, 20.0, 30.0]], Unit::Angstrom);
        let nm = q.to_unit(Unit::Nanometer).unwrap();
        assert!((nm.values[0][0] - 1.0).abs() < 1e-12);
        assert!((nm.values[0][2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_conversion_rejects_dimension_change() {
        let q = Quantity::new(vec![[1.0, 1.0, 1.0]], Unit::Angstrom);
        assert!(q.to_unit(Unit::NanometerPerPicosecond).is_err());
    }

    #[test]
    fn test_dimension_of_units() {
        assert_eq!(Unit::Nanometer.dimension(), Dimension::Length);
        assert_eq!(
            Unit::AngstromPerPicosecond.dimension(),
            Dimension::Velocity
        );
    }
}
