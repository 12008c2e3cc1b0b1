//! 仿真模块
//!
//! 此模块包含相位步进仿真器与可选的延迟采样器。

// 子模块声明
mod sampler;
mod simulator;

// 重新导出公共接口
pub use sampler::Sampler;
pub use simulator::{SimError, Simulator};
