//! # 命令执行模块
//!
//! 实现启动器的业务逻辑：读协议文件、按格式加载各输入、
//! 用检查点覆盖状态、构建体系摘要并打印。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config/`, `loaders/`, `models/`, `utils/`

use crate::cli::Cli;
use crate::config::{self, ProtocolConfig};
use crate::error::Result;
use crate::loaders::system::{SystemHandler, SystemLoadOptions};
use crate::loaders::{box_vectors, positions, restart, velocities};
use crate::models::quantity::Unit;
use crate::models::system::System;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 执行加载流程
pub fn run(cli: Cli) -> Result<()> {
    output::print_header("mdprotocol - loading simulation inputs");

    let config = config::load_protocol_file(&cli.input)?;
    if let Some(name) = &config.name {
        output::print_info(&format!("Protocol: {}", name));
    }
    if let Some(platform) = cli.platform {
        output::print_info(&format!("Requested platform: {}", platform));
    }
    if let Some(precision) = cli.precision {
        output::print_info(&format!("Requested precision: {}", precision));
    }

    let handler = load_inputs(&config)?;
    let system = handler.create_system(&config.system_options)?;

    print_summary(&handler, &system);
    output::print_done("All inputs loaded and validated");
    Ok(())
}

/// 按协议文件加载全部输入
///
/// 加载顺序：拓扑 → 独立的坐标/速度/盒子文件 → 检查点。
/// 后加载的覆盖先加载的，检查点里缺失的字段不清除已有值。
fn load_inputs(config: &ProtocolConfig) -> Result<SystemHandler> {
    let options = SystemLoadOptions {
        forcefields: config.forcefields.clone(),
        charmm_parameters: config.charmm_parameters.clone(),
    };
    let mut handler = SystemHandler::load(&config.topology, &options)?;
    output::print_success(&format!("Topology: {}", config.topology.display()));

    if let Some(path) = &config.positions {
        handler
            .container_mut()
            .set_positions(Some(positions::load(path)?))?;
        output::print_success(&format!("Positions: {}", path.display()));
    }

    if let Some(path) = &config.velocities {
        handler
            .container_mut()
            .set_velocities(Some(velocities::load(path)?))?;
        output::print_success(&format!("Velocities: {}", path.display()));
    }

    if let Some(path) = &config.box_vectors {
        handler
            .container_mut()
            .set_box_vectors(Some(box_vectors::load(path)?))?;
        output::print_success(&format!("Box vectors: {}", path.display()));
    }

    if let Some(path) = &config.checkpoint {
        let state = restart::load(path)?;
        if state.has_positions() && config.positions.is_some() {
            output::print_warning("Checkpoint overrides the positions file");
        }
        if state.has_positions() {
            handler
                .container_mut()
                .set_positions(state.positions().cloned())?;
        }
        if state.has_velocities() {
            handler
                .container_mut()
                .set_velocities(state.velocities().cloned())?;
        }
        if state.has_box() {
            handler
                .container_mut()
                .set_box_vectors(state.box_vectors().cloned())?;
        }
        output::print_success(&format!("Checkpoint: {}", path.display()));
    }

    Ok(handler)
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// 打印加载结果摘要表
fn print_summary(handler: &SystemHandler, system: &System) {
    let container = handler.container();
    let mut rows = Vec::new();

    rows.push(SummaryRow {
        field: "source",
        value: match (handler.path(), handler.master()) {
            (Some(p), Some(m)) => format!("{} ({})", p.display(), m.kind()),
            _ => "-".to_string(),
        },
    });
    rows.push(SummaryRow {
        field: "topology",
        value: match container.topology() {
            Some(t) => format!(
                "{} atoms, {} residues, {} chains ({})",
                t.n_atoms(),
                t.n_residues(),
                t.n_chains(),
                t.formula()
            ),
            None => "-".to_string(),
        },
    });
    rows.push(SummaryRow {
        field: "positions",
        value: match container.positions() {
            Some(q) => format!("{} x 3 ({})", q.len(), q.unit.symbol()),
            None => "-".to_string(),
        },
    });
    rows.push(SummaryRow {
        field: "velocities",
        value: match container.velocities() {
            Some(q) => format!("{} x 3 ({})", q.len(), q.unit.symbol()),
            None => "-".to_string(),
        },
    });
    rows.push(SummaryRow {
        field: "box",
        // 统一换算到 nm 显示，便于和截断半径对照
        value: match container.box_vectors().map(|q| q.to_unit(Unit::Nanometer)) {
            Some(Ok(q)) => format!(
                "({:.3}, {:.3}, {:.3}) {}",
                q.values[0][0],
                q.values[1][1],
                q.values[2][2],
                q.unit.symbol()
            ),
            _ => "-".to_string(),
        },
    });
    rows.push(SummaryRow {
        field: "parameters",
        value: system.parameter_source.clone(),
    });
    rows.push(SummaryRow {
        field: "system",
        value: format!(
            "{} particles, {} bonds, cutoff {} nm, constraints: {}",
            system.n_particles,
            system.n_bonds,
            system.options.nonbonded_cutoff,
            system.options.constraints
        ),
    });

    let table = Table::new(&rows);
    println!("{}", table);
}
