//! 拓扑构建模块

// 子模块声明
mod rotor;

// 重新导出公共接口
pub use rotor::{build_rotor, target_cycle, RotorOpts};
