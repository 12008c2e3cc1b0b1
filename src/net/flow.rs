//! 流定义

use super::id::{NodeId, Packets};

/// 一条流：在 ingress 节点持续注入、在 egress 节点离开网络的包流。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flow {
    pub ingress: NodeId,
    pub egress: NodeId,
    /// 每个 step 注入的包数
    pub amount: Packets,
}

impl Flow {
    pub fn new(ingress: NodeId, egress: NodeId, amount: Packets) -> Self {
        Self {
            ingress,
            egress,
            amount,
        }
    }
}
