//! Fixed 调度
//!
//! 每个 (phase, node, egress) 缓存唯一的最优选择；未命中时对该 egress
//! 跑一次反向最短路并沿前驱链提取所有 (phase, node) 的下一跳。

use std::collections::HashMap;

use tracing::debug;

use crate::config::ChoiceParams;
use crate::graph::{reverse_dijkstra, CostPolicy, TVertex, TemporalGraph};
use crate::net::{FlowId, Network, NodeId};

use super::{ScheduleChoice, Scheduler};

pub struct FixedScheduler {
    graph: TemporalGraph,
    policy: CostPolicy,
    /// (phase, node, egress) → 选择
    cache: HashMap<(usize, usize, usize), ScheduleChoice>,
}

impl FixedScheduler {
    pub fn new(net: &Network, params: &ChoiceParams) -> Self {
        Self {
            graph: TemporalGraph::new(&net.topology),
            policy: params.policy,
            cache: HashMap::new(),
        }
    }

    /// 为某个 egress 一次性填充所有 (phase, node) 的选择。
    fn compute_to_destination(&mut self, net: &Network, egress: NodeId) {
        debug!(egress = egress.0, "计算到目的节点的固定选择");
        let tree = reverse_dijkstra(&self.graph, self.graph.node_vertex(egress), self.policy);

        let topology = &net.topology;
        for phase in 0..topology.num_phases() {
            for node in 0..topology.num_nodes() {
                let node = NodeId(node);
                // 退路：任一拥有端口，提交到下一相位
                let mut port = topology.find_owned_port(node);
                let mut choice_phase = topology.phase_add(phase, 1);

                let start = self.graph.phase_node_vertex(phase, node);
                let mut next = tree.pred[start.0];
                // 沿前驱链跳过中间的 PhaseNode，直到命中 PhasePort。
                // 当前边集下前驱不会是 PhaseNode；手工扩展的图也能降级到退路。
                while let Some(v) = next {
                    match self.graph.vertex(v) {
                        TVertex::PhasePort {
                            phase: pp_phase,
                            port: pp_port,
                        } => {
                            port = pp_port;
                            choice_phase = pp_phase;
                            break;
                        }
                        TVertex::PhaseNode { .. } => next = tree.pred[v.0],
                        TVertex::Node(_) => break,
                    }
                }

                self.cache.insert(
                    (phase, node.0, egress.0),
                    ScheduleChoice {
                        port,
                        phase: choice_phase,
                    },
                );
            }
        }
    }
}

impl Scheduler for FixedScheduler {
    fn begin(&mut self) {}

    fn prepare_choices(&mut self) {}

    fn choice(
        &mut self,
        phase: usize,
        node: NodeId,
        flow: FlowId,
        net: &Network,
    ) -> ScheduleChoice {
        let egress = net.flows[flow.0].egress;
        let key = (phase, node.0, egress.0);
        if let Some(choice) = self.cache.get(&key) {
            return *choice;
        }
        self.compute_to_destination(net, egress);
        self.cache[&key]
    }
}
