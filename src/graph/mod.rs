//! 时间扩展图模块
//!
//! 此模块包含分层图的构造、代价策略与反向最短路，以及 DOT 导出。

// 子模块声明
mod dijkstra;
mod dot;
mod temporal;
mod vertex;

// 重新导出公共接口
pub use dijkstra::{reverse_dijkstra, CostPolicy, ReverseTree, UNREACHABLE};
pub use dot::write_dot;
pub use temporal::TemporalGraph;
pub use vertex::{TEdge, TVertex, VertexId};
