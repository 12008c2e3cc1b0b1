//! rotorsim-rs：时间扩展（temporal）网络上的流量仿真与调度
//!
//! 拓扑中每个端口的目的节点按相位周期轮转。本 crate 为每个
//! (phase, node, flow) 预计算转发选择（三种策略：fixed / randomized /
//! capacity-aware），并以相位步进的确定性状态机驱动缓冲占用，
//! 支持溢出检测与包级延迟采样。

pub mod config;
pub mod graph;
pub mod net;
pub mod sched;
pub mod sim;
pub mod topo;
pub mod viz;

#[cfg(test)]
mod test;

// 导出最常用的类型，供 bin 文件与下游使用
pub use net::{Network, NetworkBuilder};
pub use sched::{ScheduleChoice, Scheduler};
pub use sim::Simulator;
