//! 标识符类型
//!
//! 定义节点、端口和流的唯一标识符。

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// 端口标识符（每个端口由唯一节点拥有，单向发送）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub usize);

/// 流标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowId(pub usize);

/// 包计数。有符号：中间 delta 计算可为负。
pub type Packets = i64;
