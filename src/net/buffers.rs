//! 缓冲区
//!
//! 按 `[phase][port][flow]` 行主序的致密数组，以及端口负载聚合。
//! 布局：`phase * (Q * F) + port * F + flow`。

use super::id::{FlowId, NodeId, Packets, PortId};
use super::topology::Topology;

/// 分相位端口缓冲：某流在某端口上、等待在某相位发送的包数。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffers {
    values: Vec<Packets>,
    phases: usize,
    ports: usize,
    flows: usize,
}

impl Buffers {
    pub fn new(phases: usize, ports: usize, flows: usize) -> Self {
        Self {
            values: vec![0; phases * ports * flows],
            phases,
            ports,
            flows,
        }
    }

    pub fn num_phases(&self) -> usize {
        self.phases
    }

    pub fn num_ports(&self) -> usize {
        self.ports
    }

    pub fn num_flows(&self) -> usize {
        self.flows
    }

    #[inline]
    fn index(&self, phase: usize, port: PortId, flow: FlowId) -> usize {
        phase * self.ports * self.flows + port.0 * self.flows + flow.0
    }

    #[inline]
    pub fn get(&self, phase: usize, port: PortId, flow: FlowId) -> Packets {
        self.values[self.index(phase, port, flow)]
    }

    #[inline]
    pub fn get_mut(&mut self, phase: usize, port: PortId, flow: FlowId) -> &mut Packets {
        let ix = self.index(phase, port, flow);
        &mut self.values[ix]
    }

    pub fn fill(&mut self, value: Packets) {
        self.values.fill(value);
    }

    /// 某端口在某相位缓冲的总包数（对流求和）
    pub fn port_buffered(&self, phase: usize, port: PortId) -> Packets {
        let start = self.index(phase, port, FlowId(0));
        self.values[start..start + self.flows].iter().sum()
    }

    /// 某端口所有相位的缓冲总量
    pub fn total_port_buffered(&self, port: PortId) -> Packets {
        (0..self.phases).map(|i| self.port_buffered(i, port)).sum()
    }

    /// 网内包总数
    pub fn packets_in_network(&self) -> Packets {
        self.values.iter().sum()
    }

    /// 停留在某节点（其拥有的所有端口）上的包数
    pub fn packets_at_node(&self, topology: &Topology, node: NodeId) -> Packets {
        (0..self.ports)
            .filter(|&p| topology.owner(PortId(p)) == node)
            .map(|p| self.total_port_buffered(PortId(p)))
            .sum()
    }

    /// 某端口某相位缓冲量与容量之比
    pub fn port_load(&self, topology: &Topology, port: PortId, phase: usize) -> f64 {
        self.port_buffered(phase, port) as f64 / topology.capacity(port) as f64
    }

    /// 某端口全部相位的负载之和（容量分数）
    pub fn total_port_load(&self, topology: &Topology, port: PortId) -> f64 {
        (0..self.phases)
            .map(|i| self.port_load(topology, port, i))
            .sum()
    }
}
