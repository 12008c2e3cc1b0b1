//! 时间扩展图的 DOT 导出（诊断用）

use std::io::{self, Write};

use super::temporal::TemporalGraph;
use super::vertex::{TVertex, VertexId};

fn vertex_label(v: TVertex) -> String {
    match v {
        TVertex::Node(n) => format!("N({})", n.0),
        TVertex::PhaseNode { phase, node } => format!("PN({},{})", phase, node.0),
        TVertex::PhasePort { phase, port } => format!("P({},{})", phase, port.0),
    }
}

/// 以 Graphviz DOT 格式写出整个图。
pub fn write_dot<W: Write>(graph: &TemporalGraph, out: &mut W) -> io::Result<()> {
    writeln!(out, "digraph temporal {{")?;
    for v in 0..graph.num_vertices() {
        writeln!(
            out,
            "  v{} [label=\"{}\"];",
            v,
            vertex_label(graph.vertex(VertexId(v)))
        )?;
    }
    for v in 0..graph.num_vertices() {
        for &(to, edge) in graph.out_edges(VertexId(v)) {
            writeln!(
                out,
                "  v{} -> v{} [label=\"{},{}\"];",
                v, to.0, edge.time, edge.hop
            )?;
        }
    }
    writeln!(out, "}}")
}
