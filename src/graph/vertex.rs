//! 时间扩展图的顶点与边

use crate::net::{NodeId, PortId};

/// 顶点标识符（图内索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(pub usize);

/// 顶点：三个互斥的族。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TVertex {
    /// 收集器节点：吸收任意相位到达 egress 的路径，仅作反向最短路的源。
    Node(NodeId),
    /// 节点 `node` 持有、已提交到相位槽 `phase` 的包
    PhaseNode { phase: usize, node: NodeId },
    /// 端口 `port` 中排队、将在相位 `phase` 发送的包
    PhasePort { phase: usize, port: PortId },
}

/// 边权：耗费的相位数与跳数。delay 不参与计时。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TEdge {
    pub time: u32,
    pub hop: u32,
    pub delay: u32,
}
