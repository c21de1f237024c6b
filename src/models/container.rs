//! # 输入容器
//!
//! `InputContainer` 持有一次加载产生的四个可选字段：拓扑、位置、
//! 速度、盒子向量。所有 setter 在赋值时校验量纲和形状，校验失败
//! 立即返回 `TypeMismatch`，不产生半填充状态。
//!
//! ## 依赖关系
//! - 被 `loaders/` 和 `commands/` 使用
//! - 使用 `models/quantity.rs`, `models/topology.rs`

use crate::error::{MdProtocolError, Result};
use crate::models::quantity::{Dimension, Quantity};
use crate::models::topology::Topology;

/// 体系输入容器
///
/// 字段为私有，只能通过校验 setter 写入。
#[derive(Debug, Clone, Default)]
pub struct InputContainer {
    topology: Option<Topology>,
    positions: Option<Quantity>,
    velocities: Option<Quantity>,
    box_vectors: Option<Quantity>,
}

impl InputContainer {
    pub fn new() -> Self {
        InputContainer::default()
    }

    /// 从各部分构造，任一校验失败则整体失败
    pub fn from_parts(
        topology: Option<Topology>,
        positions: Option<Quantity>,
        velocities: Option<Quantity>,
        box_vectors: Option<Quantity>,
    ) -> Result<Self> {
        let mut container = InputContainer::new();
        container.set_topology(topology);
        container.set_positions(positions)?;
        container.set_velocities(velocities)?;
        container.set_box_vectors(box_vectors)?;
        Ok(container)
    }

    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref()
    }

    pub fn positions(&self) -> Option<&Quantity> {
        self.positions.as_ref()
    }

    pub fn velocities(&self) -> Option<&Quantity> {
        self.velocities.as_ref()
    }

    pub fn box_vectors(&self) -> Option<&Quantity> {
        self.box_vectors.as_ref()
    }

    pub fn set_topology(&mut self, topology: Option<Topology>) {
        self.topology = topology;
    }

    /// 设置位置；单位必须为长度量纲
    pub fn set_positions(&mut self, positions: Option<Quantity>) -> Result<()> {
        if let Some(ref q) = positions {
            check_dimension("positions", q, Dimension::Length)?;
        }
        self.positions = positions;
        Ok(())
    }

    /// 设置速度；单位必须为速度量纲
    pub fn set_velocities(&mut self, velocities: Option<Quantity>) -> Result<()> {
        if let Some(ref q) = velocities {
            check_dimension("velocities", q, Dimension::Velocity)?;
        }
        self.velocities = velocities;
        Ok(())
    }

    /// 设置盒子向量；单位必须为长度量纲且恰好 3 行
    pub fn set_box_vectors(&mut self, box_vectors: Option<Quantity>) -> Result<()> {
        if let Some(ref q) = box_vectors {
            check_dimension("box", q, Dimension::Length)?;
            if q.len() != 3 {
                return Err(MdProtocolError::TypeMismatch {
                    field: "box".to_string(),
                    expected: "3x3 vectors".to_string(),
                    actual: format!("{}x3 vectors", q.len()),
                });
            }
        }
        self.box_vectors = box_vectors;
        Ok(())
    }

    pub fn has_topology(&self) -> bool {
        self.topology.is_some()
    }

    pub fn has_positions(&self) -> bool {
        self.positions.is_some()
    }

    pub fn has_velocities(&self) -> bool {
        self.velocities.is_some()
    }

    pub fn has_box(&self) -> bool {
        self.box_vectors.is_some()
    }
}

/// 量纲校验，不匹配返回 `TypeMismatch`
fn check_dimension(field: &str, quantity: &Quantity, expected: Dimension) -> Result<()> {
    if quantity.dimension() != expected {
        return Err(MdProtocolError::TypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: quantity.dimension().to_string(),
        });
    }
    Ok(())
}
