//! 静态拓扑
//!
//! 端口归属固定不变；端口的目的节点随相位周期性轮转（rotor 模型）。
//! 按 `targets[phase * num_ports + port]` 行主序存放。

use thiserror::Error;

use super::id::{NodeId, Packets, PortId};

/// 拓扑层面的非法配置。setup 阶段致命。
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TopologyError {
    /// 端口在某相位指向其拥有者节点
    #[error("port {port} targets its own owner node {node} in phase {phase}")]
    SelfLoop {
        phase: usize,
        port: usize,
        node: usize,
    },
    /// 流的 ingress 与 egress 相同
    #[error("flow {flow} has ingress == egress (node {node})")]
    SelfFlow { flow: usize, node: usize },
}

/// 静态网络描述：端口归属、分相位目标、容量与带宽。
#[derive(Debug, Clone)]
pub struct Topology {
    num_phases: usize,
    num_nodes: usize,
    num_ports: usize,
    /// 目的节点，`phase * num_ports + port`
    targets: Vec<NodeId>,
    owners: Vec<NodeId>,
    capacities: Vec<Packets>,
    bandwidths: Vec<Packets>,
}

impl Topology {
    pub fn new(num_phases: usize, num_nodes: usize, num_ports: usize) -> Self {
        Self {
            num_phases,
            num_nodes,
            num_ports,
            targets: vec![NodeId(0); num_phases * num_ports],
            owners: vec![NodeId(0); num_ports],
            capacities: vec![0; num_ports],
            bandwidths: vec![0; num_ports],
        }
    }

    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_ports(&self) -> usize {
        self.num_ports
    }

    /// 该端口在给定相位发送时的接收节点
    pub fn target(&self, phase: usize, port: PortId) -> NodeId {
        self.targets[phase * self.num_ports + port.0]
    }

    /// 拥有（通过）该端口发送的节点
    pub fn owner(&self, port: PortId) -> NodeId {
        self.owners[port.0]
    }

    pub fn capacity(&self, port: PortId) -> Packets {
        self.capacities[port.0]
    }

    pub fn bandwidth(&self, port: PortId) -> Packets {
        self.bandwidths[port.0]
    }

    /// 相位模加
    pub fn phase_add(&self, phase: usize, add: usize) -> usize {
        (phase + add) % self.num_phases
    }

    /// 节点拥有的第一个端口；没有时退化为端口 0。
    pub fn find_owned_port(&self, node: NodeId) -> PortId {
        for (i, owner) in self.owners.iter().enumerate() {
            if *owner == node {
                return PortId(i);
            }
        }
        PortId(0)
    }

    pub fn set_owners(&mut self, owners: &[NodeId]) {
        debug_assert_eq!(owners.len(), self.num_ports);
        self.owners.copy_from_slice(owners);
    }

    pub fn set_capacities(&mut self, capacities: &[Packets]) {
        debug_assert_eq!(capacities.len(), self.num_ports);
        self.capacities.copy_from_slice(capacities);
    }

    pub fn set_bandwidths(&mut self, bandwidths: &[Packets]) {
        debug_assert_eq!(bandwidths.len(), self.num_ports);
        self.bandwidths.copy_from_slice(bandwidths);
    }

    /// 写入一个相位的整行目标
    pub fn set_phase_targets(&mut self, phase: usize, targets: &[NodeId]) {
        debug_assert_eq!(targets.len(), self.num_ports);
        let start = phase * self.num_ports;
        self.targets[start..start + self.num_ports].copy_from_slice(targets);
    }

    /// 拒绝自环端口：任何相位 `target == owner` 都非法。
    pub fn validate(&self) -> Result<(), TopologyError> {
        for phase in 0..self.num_phases {
            for port in 0..self.num_ports {
                let p = PortId(port);
                if self.target(phase, p) == self.owner(p) {
                    return Err(TopologyError::SelfLoop {
                        phase,
                        port,
                        node: self.owner(p).0,
                    });
                }
            }
        }
        Ok(())
    }
}
