//! # 数据模型模块
//!
//! 定义统一的体系输入表示：带单位的物理量、拓扑、输入容器、
//! 力场/参数集以及体系构建产物。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `loaders/`, `commands/` 使用
//! - 无外部模块依赖

pub mod container;
pub mod forcefield;
pub mod quantity;
pub mod system;
pub mod topology;

pub use container::InputContainer;
pub use forcefield::{CharmmParameterSet, ForceField};
pub use quantity::{Dimension, Quantity, Unit};
pub use system::{System, SystemOptions};
pub use topology::{Bond, TopAtom, Topology};
