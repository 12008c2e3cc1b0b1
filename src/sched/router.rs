//! 路由核心
//!
//! 对每个 egress 在反向图上跑一次 Dijkstra，然后为每个 (phase, node)
//! 从 PhaseNode 的正向出边中提取至多 K 条端口互异、按代价升序的候选。

use tracing::trace;

use crate::graph::{reverse_dijkstra, CostPolicy, TVertex, TemporalGraph, UNREACHABLE};
use crate::net::{Network, NodeId, PortId};

use super::ScheduleChoice;

/// 一条带代价的候选
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedChoice {
    pub port: PortId,
    pub phase: usize,
    pub cost: u64,
}

impl RankedChoice {
    pub fn choice(&self) -> ScheduleChoice {
        ScheduleChoice {
            port: self.port,
            phase: self.phase,
        }
    }
}

/// 某个 egress 的选择表：(phase, node) → 候选列表，扁平只读。
#[derive(Debug, Clone)]
pub struct ChoiceTable {
    num_nodes: usize,
    entries: Vec<Vec<RankedChoice>>,
}

impl ChoiceTable {
    /// 构造到 `egress` 的 K 路选择表。
    pub fn build(
        graph: &TemporalGraph,
        egress: NodeId,
        policy: CostPolicy,
        num_paths: usize,
    ) -> Self {
        let tree = reverse_dijkstra(graph, graph.node_vertex(egress), policy);

        let num_phases = graph.num_phases();
        let num_nodes = graph.num_nodes();
        let mut entries = Vec::with_capacity(num_phases * num_nodes);
        let mut neighbours: Vec<RankedChoice> = Vec::new();

        for phase in 0..num_phases {
            for node in 0..num_nodes {
                let node = NodeId(node);
                neighbours.clear();
                let current = graph.phase_node_vertex(phase, node);

                for &(next, edge) in graph.out_edges(current) {
                    if let TVertex::PhasePort {
                        phase: pp_phase,
                        port,
                    } = graph.vertex(next)
                    {
                        let d = tree.dist[next.0];
                        if d == UNREACHABLE {
                            continue;
                        }
                        // 记得加上这条边本身的权
                        neighbours.push(RankedChoice {
                            port,
                            phase: pp_phase,
                            cost: policy.edge_cost(&edge).saturating_add(d),
                        });
                    }
                }
                if neighbours.is_empty() {
                    // egress 不可达：退化为按边代价排序的后继，
                    // 保证任何拥有端口的节点仍得到非空候选列表。
                    for &(next, edge) in graph.out_edges(current) {
                        if let TVertex::PhasePort {
                            phase: pp_phase,
                            port,
                        } = graph.vertex(next)
                        {
                            neighbours.push(RankedChoice {
                                port,
                                phase: pp_phase,
                                cost: policy.edge_cost(&edge),
                            });
                        }
                    }
                    trace!(
                        phase,
                        node = node.0,
                        egress = egress.0,
                        "egress 不可达，使用边代价退路"
                    );
                }
                entries.push(take_port_diverse(&mut neighbours, num_paths));
            }
        }

        Self { num_nodes, entries }
    }

    /// 对所有 flows 去重构造：每个不同 egress 一张表。
    /// 返回 (表集合, flow → 表下标)。
    pub fn per_egress(
        net: &Network,
        policy: CostPolicy,
        num_paths: usize,
    ) -> (Vec<ChoiceTable>, Vec<usize>) {
        let graph = TemporalGraph::new(&net.topology);
        let mut tables = Vec::new();
        let mut egress_ix: Vec<Option<usize>> = vec![None; net.topology.num_nodes()];
        let mut flow_table = Vec::with_capacity(net.flows.len());
        for flow in &net.flows {
            let egress = flow.egress;
            let ix = match egress_ix[egress.0] {
                Some(ix) => ix,
                None => {
                    let ix = tables.len();
                    tables.push(ChoiceTable::build(&graph, egress, policy, num_paths));
                    egress_ix[egress.0] = Some(ix);
                    ix
                }
            };
            flow_table.push(ix);
        }
        (tables, flow_table)
    }

    pub fn get(&self, phase: usize, node: NodeId) -> &[RankedChoice] {
        &self.entries[phase * self.num_nodes + node.0]
    }
}

/// 稳定排序后贪心取前 K 条端口互异的候选。
/// K 大于可用端口数时不会带来更多分集。
fn take_port_diverse(neighbours: &mut Vec<RankedChoice>, num_paths: usize) -> Vec<RankedChoice> {
    neighbours.sort_by_key(|c| c.cost);
    let mut options = Vec::with_capacity(num_paths);
    let mut seen_ports: Vec<PortId> = Vec::with_capacity(num_paths);
    for c in neighbours.iter() {
        if seen_ports.contains(&c.port) {
            continue;
        }
        seen_ports.push(c.port);
        options.push(*c);
        if options.len() >= num_paths {
            break;
        }
    }
    options
}
