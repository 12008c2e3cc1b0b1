//! 反向最短路
//!
//! 以 egress 的收集器顶点为源、沿反向邻接表跑 Dijkstra，
//! 得到正向图中每个顶点到 egress 的最短代价与下一跳。
//! 非收集器顶点间无环（传输边严格推进相位），非负权，Dijkstra 即可。

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::temporal::TemporalGraph;
use super::vertex::{TEdge, VertexId};

/// 不可达距离
pub const UNREACHABLE: u64 = u64::MAX;

/// 边代价合成策略。系数 10 000 足够：单项 time / hop 都以 P·F·Q 为界。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostPolicy {
    /// 最小化总相位数，跳数破平
    Quickest,
    /// 最小化跳数，相位数破平
    FewestHops,
}

impl CostPolicy {
    pub fn edge_cost(self, edge: &TEdge) -> u64 {
        match self {
            CostPolicy::Quickest => 10_000 * edge.time as u64 + edge.hop as u64,
            CostPolicy::FewestHops => 10_000 * edge.hop as u64 + edge.time as u64,
        }
    }
}

/// 反向 Dijkstra 的结果。
///
/// `dist[v]` 是正向图中从 v 到源（egress 收集器）的最短代价；
/// `pred[v]` 是 v 沿最短路通往源的下一个顶点。
#[derive(Debug, Clone)]
pub struct ReverseTree {
    pub dist: Vec<u64>,
    pub pred: Vec<Option<VertexId>>,
}

pub fn reverse_dijkstra(graph: &TemporalGraph, source: VertexId, policy: CostPolicy) -> ReverseTree {
    let n = graph.num_vertices();
    let mut dist = vec![UNREACHABLE; n];
    let mut pred: Vec<Option<VertexId>> = vec![None; n];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::new();

    dist[source.0] = 0;
    heap.push(Reverse((0, source.0)));

    while let Some(Reverse((d, u))) = heap.pop() {
        if d > dist[u] {
            continue; // 过期条目
        }
        for &(v, edge) in graph.rev_edges(VertexId(u)) {
            let nd = d.saturating_add(policy.edge_cost(&edge));
            if nd < dist[v.0] {
                dist[v.0] = nd;
                // 反向图中 v 经 u 松弛，即正向图中 v 的下一跳是 u
                pred[v.0] = Some(VertexId(u));
                heap.push(Reverse((nd, v.0)));
            }
        }
    }

    ReverseTree { dist, pred }
}
