//! 时间扩展图 DOT 导出
//!
//! 构建 rotor 拓扑的分层图并以 Graphviz DOT 输出（诊断用）。

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use rotorsim_rs::graph::{write_dot, TemporalGraph};
use rotorsim_rs::topo::{build_rotor, RotorOpts};

#[derive(Debug, Parser)]
#[command(name = "graph_dot", about = "导出 rotor 拓扑的时间扩展图（DOT 格式）")]
struct Args {
    #[arg(long, default_value_t = 4)]
    phases: usize,
    #[arg(long, default_value_t = 5)]
    nodes: usize,
    #[arg(long, default_value_t = 2)]
    ports_per_node: usize,
    /// 输出文件；缺省写到 stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let topology = build_rotor(&RotorOpts {
        num_phases: args.phases,
        num_nodes: args.nodes,
        ports_per_node: args.ports_per_node,
        ..RotorOpts::default()
    });
    let graph = TemporalGraph::new(&topology);

    match &args.out {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_dot(&graph, &mut out)?;
            out.flush()
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_dot(&graph, &mut out)
        }
    }
}
