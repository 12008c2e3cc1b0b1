//! 网络状态模块
//!
//! 此模块包含静态拓扑、流定义、致密缓冲区与统计信息。

// 子模块声明
mod buffers;
mod flow;
mod id;
mod network;
mod stats;
mod topology;

// 重新导出公共接口
pub use buffers::Buffers;
pub use flow::Flow;
pub use id::{FlowId, NodeId, Packets, PortId};
pub use network::{BuildError, Network, NetworkBuilder};
pub use stats::Stats;
pub use topology::{Topology, TopologyError};
