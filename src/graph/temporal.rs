//! 时间扩展图构造
//!
//! 顶点按三个连续块分配：收集器节点、PhaseNode、PhasePort，
//! 使 `n`、`N + φ·N + n`、`N + P·N + φ·Q + p` 可直接用作索引。
//! 边集：
//! - 传输边 `PP(φ,p) → PN((φ+1) mod P, target(φ,p))`，权 (1,1,0)；
//! - 入队边 `PN(φ, owner(p)) → PP((φ+w) mod P, p)`，w ∈ 1..=P，权 (w,0,1)，
//!   多条入队边隐式编码"等待 w 个相位再发送"；
//! - 收集边 `PN(φ,n) → N(n)`，权 (0,0,0)。

use tracing::debug;

use crate::net::{NodeId, PortId, Topology};

use super::vertex::{TEdge, TVertex, VertexId};

/// 分层图：正向与反向邻接表同时维护。
#[derive(Debug, Clone)]
pub struct TemporalGraph {
    num_phases: usize,
    num_nodes: usize,
    num_ports: usize,
    vertices: Vec<TVertex>,
    out_edges: Vec<Vec<(VertexId, TEdge)>>,
    rev_edges: Vec<Vec<(VertexId, TEdge)>>,
}

impl TemporalGraph {
    pub fn new(topology: &Topology) -> Self {
        let num_phases = topology.num_phases();
        let num_nodes = topology.num_nodes();
        let num_ports = topology.num_ports();
        let num_vertices = num_nodes + num_phases * num_nodes + num_phases * num_ports;

        let mut graph = Self {
            num_phases,
            num_nodes,
            num_ports,
            vertices: Vec::with_capacity(num_vertices),
            out_edges: vec![Vec::new(); num_vertices],
            rev_edges: vec![Vec::new(); num_vertices],
        };
        graph.create_vertices();
        graph.create_transfers(topology);
        graph.create_collector_edges();

        debug!(
            vertices = graph.vertices.len(),
            edges = graph.out_edges.iter().map(Vec::len).sum::<usize>(),
            "时间扩展图构造完成"
        );
        graph
    }

    fn create_vertices(&mut self) {
        // 收集器节点
        for node in 0..self.num_nodes {
            self.vertices.push(TVertex::Node(NodeId(node)));
        }
        // PhaseNode
        for phase in 0..self.num_phases {
            for node in 0..self.num_nodes {
                self.vertices.push(TVertex::PhaseNode {
                    phase,
                    node: NodeId(node),
                });
            }
        }
        // PhasePort
        for phase in 0..self.num_phases {
            for port in 0..self.num_ports {
                self.vertices.push(TVertex::PhasePort {
                    phase,
                    port: PortId(port),
                });
            }
        }
    }

    fn create_transfers(&mut self, topology: &Topology) {
        // 传输边：端口在相位 φ 发送，下一相位到达目标节点
        for phase in 0..self.num_phases {
            for port in 0..self.num_ports {
                let target = topology.target(phase, PortId(port));
                let from = self.phase_port_vertex(phase, PortId(port));
                let arrive_phase = self.phase_add(phase, 1);
                let to = self.phase_node_vertex(arrive_phase, target);
                self.add_edge(
                    from,
                    to,
                    TEdge {
                        time: 1,
                        hop: 1,
                        delay: 0,
                    },
                );
            }
        }
        // 入队边：节点把包放入自己端口的某个相位槽（等待 w 个相位）
        for phase in 0..self.num_phases {
            for port in 0..self.num_ports {
                let owner = topology.owner(PortId(port));
                let from = self.phase_node_vertex(phase, owner);
                for wait in 1..=self.num_phases {
                    let target_phase = self.phase_add(phase, wait);
                    let to = self.phase_port_vertex(target_phase, PortId(port));
                    self.add_edge(
                        from,
                        to,
                        TEdge {
                            time: wait as u32,
                            hop: 0,
                            delay: 1,
                        },
                    );
                }
            }
        }
    }

    // 所有 PhaseNode 连到其主收集器节点，方便以单源跑最短路。
    fn create_collector_edges(&mut self) {
        for phase in 0..self.num_phases {
            for node in 0..self.num_nodes {
                let from = self.phase_node_vertex(phase, NodeId(node));
                let to = self.node_vertex(NodeId(node));
                self.add_edge(
                    from,
                    to,
                    TEdge {
                        time: 0,
                        hop: 0,
                        delay: 0,
                    },
                );
            }
        }
    }

    fn add_edge(&mut self, from: VertexId, to: VertexId, edge: TEdge) {
        self.out_edges[from.0].push((to, edge));
        self.rev_edges[to.0].push((from, edge));
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
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

    pub fn vertex(&self, v: VertexId) -> TVertex {
        self.vertices[v.0]
    }

    /// 收集器节点顶点
    pub fn node_vertex(&self, node: NodeId) -> VertexId {
        VertexId(node.0)
    }

    pub fn phase_node_vertex(&self, phase: usize, node: NodeId) -> VertexId {
        VertexId(self.num_nodes + phase * self.num_nodes + node.0)
    }

    pub fn phase_port_vertex(&self, phase: usize, port: PortId) -> VertexId {
        VertexId(
            self.num_nodes + self.num_phases * self.num_nodes + phase * self.num_ports + port.0,
        )
    }

    pub fn out_edges(&self, v: VertexId) -> &[(VertexId, TEdge)] {
        &self.out_edges[v.0]
    }

    pub fn rev_edges(&self, v: VertexId) -> &[(VertexId, TEdge)] {
        &self.rev_edges[v.0]
    }

    pub fn phase_add(&self, phase: usize, add: usize) -> usize {
        (phase + add) % self.num_phases
    }
}
