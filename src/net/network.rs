//! 网络状态
//!
//! 把拓扑、流与缓冲区集中为一个可拥有的网络状态，并提供按固定顺序
//! 摄入参数的 builder（sizes → 容量 → 带宽 → 归属 → 流 → 分相位拓扑 → build）。

use thiserror::Error;
use tracing::debug;

use super::buffers::Buffers;
use super::flow::Flow;
use super::id::{NodeId, Packets, PortId};
use super::topology::{Topology, TopologyError};

/// builder 摄入阶段的错误。setup 阶段致命。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("basic params must be set before pushing {what}")]
    ParamsNotSet { what: &'static str },
    #[error("{what} has length {got}, expected {want}")]
    BadLength {
        what: &'static str,
        got: usize,
        want: usize,
    },
    #[error("flow index {index} out of range ({num_flows} flows)")]
    FlowOutOfRange { index: usize, num_flows: usize },
    #[error("phase {phase} out of range ({num_phases} phases)")]
    PhaseOutOfRange { phase: usize, num_phases: usize },
    #[error("missing {what} before build")]
    Missing { what: &'static str },
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// 整个网络的自有状态。setup 之后拓扑与流只读，缓冲区仅由仿真器修改。
#[derive(Debug, Clone)]
pub struct Network {
    pub topology: Topology,
    pub flows: Vec<Flow>,
    pub buffers: Buffers,
}

impl Network {
    /// 校验拓扑与流并分配缓冲区。
    pub fn new(topology: Topology, flows: Vec<Flow>) -> Result<Self, TopologyError> {
        topology.validate()?;
        for (i, f) in flows.iter().enumerate() {
            if f.ingress == f.egress {
                return Err(TopologyError::SelfFlow {
                    flow: i,
                    node: f.ingress.0,
                });
            }
        }
        let buffers = Buffers::new(topology.num_phases(), topology.num_ports(), flows.len());
        Ok(Self {
            topology,
            flows,
            buffers,
        })
    }

    pub fn num_flows(&self) -> usize {
        self.flows.len()
    }

    /// 端口全相位负载之和（容量分数），容量感知调度的判据。
    pub fn total_port_load(&self, port: PortId) -> f64 {
        self.buffers.total_port_load(&self.topology, port)
    }
}

/// 按摄入顺序构造网络。
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    num_phases: usize,
    num_nodes: usize,
    num_flows: usize,
    num_ports: usize,
    params_set: bool,
    capacities: Option<Vec<Packets>>,
    bandwidths: Option<Vec<Packets>>,
    owners: Option<Vec<NodeId>>,
    flows: Vec<Option<Flow>>,
    targets: Vec<Option<Vec<NodeId>>>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn basic_params(
        &mut self,
        num_phases: usize,
        num_nodes: usize,
        num_flows: usize,
        num_ports: usize,
    ) -> &mut Self {
        debug!(num_phases, num_nodes, num_flows, num_ports, "摄入基本参数");
        self.num_phases = num_phases;
        self.num_nodes = num_nodes;
        self.num_flows = num_flows;
        self.num_ports = num_ports;
        self.params_set = true;
        self.flows = vec![None; num_flows];
        self.targets = vec![None; num_phases];
        self
    }

    fn check_ports_len(&self, what: &'static str, len: usize) -> Result<(), BuildError> {
        if !self.params_set {
            return Err(BuildError::ParamsNotSet { what });
        }
        if len != self.num_ports {
            return Err(BuildError::BadLength {
                what,
                got: len,
                want: self.num_ports,
            });
        }
        Ok(())
    }

    pub fn port_capacities(&mut self, capacities: &[Packets]) -> Result<&mut Self, BuildError> {
        self.check_ports_len("capacities", capacities.len())?;
        self.capacities = Some(capacities.to_vec());
        Ok(self)
    }

    pub fn port_bandwidths(&mut self, bandwidths: &[Packets]) -> Result<&mut Self, BuildError> {
        self.check_ports_len("bandwidths", bandwidths.len())?;
        self.bandwidths = Some(bandwidths.to_vec());
        Ok(self)
    }

    pub fn push_port_owners(&mut self, owners: &[NodeId]) -> Result<&mut Self, BuildError> {
        self.check_ports_len("port owners", owners.len())?;
        self.owners = Some(owners.to_vec());
        Ok(self)
    }

    pub fn push_flow(
        &mut self,
        index: usize,
        ingress: NodeId,
        egress: NodeId,
        amount: Packets,
    ) -> Result<&mut Self, BuildError> {
        if !self.params_set {
            return Err(BuildError::ParamsNotSet { what: "flows" });
        }
        if index >= self.num_flows {
            return Err(BuildError::FlowOutOfRange {
                index,
                num_flows: self.num_flows,
            });
        }
        self.flows[index] = Some(Flow::new(ingress, egress, amount));
        Ok(self)
    }

    pub fn push_topology(
        &mut self,
        phase: usize,
        targets: &[NodeId],
    ) -> Result<&mut Self, BuildError> {
        self.check_ports_len("topology row", targets.len())?;
        if phase >= self.num_phases {
            return Err(BuildError::PhaseOutOfRange {
                phase,
                num_phases: self.num_phases,
            });
        }
        self.targets[phase] = Some(targets.to_vec());
        Ok(self)
    }

    /// 完成摄入并校验。之后不再允许修改。
    pub fn build(self) -> Result<Network, BuildError> {
        if !self.params_set {
            return Err(BuildError::ParamsNotSet { what: "build" });
        }
        let capacities = self
            .capacities
            .ok_or(BuildError::Missing { what: "capacities" })?;
        let bandwidths = self
            .bandwidths
            .ok_or(BuildError::Missing { what: "bandwidths" })?;
        let owners = self
            .owners
            .ok_or(BuildError::Missing { what: "port owners" })?;

        let mut topology = Topology::new(self.num_phases, self.num_nodes, self.num_ports);
        topology.set_capacities(&capacities);
        topology.set_bandwidths(&bandwidths);
        topology.set_owners(&owners);
        for (phase, row) in self.targets.into_iter().enumerate() {
            let row = row.ok_or(BuildError::Missing {
                what: "topology row",
            })?;
            topology.set_phase_targets(phase, &row);
        }

        let mut flows = Vec::with_capacity(self.num_flows);
        for f in self.flows {
            flows.push(f.ok_or(BuildError::Missing { what: "flow" })?);
        }

        Ok(Network::new(topology, flows)?)
    }
}
