//! Rotor 拓扑相位步进仿真
//!
//! 构建全互联 rotor 拓扑，持续注入流并运行若干步，输出缓冲/溢出/延迟摘要。

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use rotorsim_rs::config::{CapacityParams, ChoiceParams};
use rotorsim_rs::net::{Flow, Network, NodeId};
use rotorsim_rs::sched::{CapacityScheduler, FixedScheduler, RandomizedScheduler, Scheduler};
use rotorsim_rs::sim::Simulator;
use rotorsim_rs::topo::{build_rotor, RotorOpts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SchedulerKind {
    Fixed,
    Random,
    Capacity,
}

#[derive(Debug, Parser)]
#[command(name = "rotor_sim", about = "Rotor 拓扑相位步进仿真：持续流注入与缓冲占用")]
struct Args {
    #[arg(long, value_enum, default_value = "fixed")]
    scheduler: SchedulerKind,
    #[arg(long, default_value_t = 100)]
    steps: u64,
    #[arg(long, default_value_t = 4)]
    phases: usize,
    #[arg(long, default_value_t = 5)]
    nodes: usize,
    #[arg(long, default_value_t = 2)]
    ports_per_node: usize,
    /// 每端口容量（包）
    #[arg(long, default_value_t = 16)]
    capacity: i64,
    /// 每端口带宽（包/步）
    #[arg(long, default_value_t = 4)]
    bandwidth: i64,
    /// 流定义 ingress:egress:amount，可重复；缺省为 0:N-1:1
    #[arg(long = "flow")]
    flows: Vec<String>,
    /// 打开包级延迟采样
    #[arg(long)]
    sample: bool,
    /// 把按步追踪写入 JSON 文件
    #[arg(long)]
    trace_json: Option<PathBuf>,
}

fn parse_flow(spec: &str) -> Result<Flow, String> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("bad flow spec {spec:?}, expected ingress:egress:amount"));
    }
    let ingress: usize = parts[0].parse().map_err(|_| format!("bad ingress in {spec:?}"))?;
    let egress: usize = parts[1].parse().map_err(|_| format!("bad egress in {spec:?}"))?;
    let amount: i64 = parts[2].parse().map_err(|_| format!("bad amount in {spec:?}"))?;
    Ok(Flow::new(NodeId(ingress), NodeId(egress), amount))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let topology = build_rotor(&RotorOpts {
        num_phases: args.phases,
        num_nodes: args.nodes,
        ports_per_node: args.ports_per_node,
        capacity: args.capacity,
        bandwidth: args.bandwidth,
    });

    let flows = if args.flows.is_empty() {
        vec![Flow::new(NodeId(0), NodeId(args.nodes - 1), 1)]
    } else {
        args.flows
            .iter()
            .map(|s| parse_flow(s))
            .collect::<Result<Vec<_>, _>>()?
    };

    let net = Network::new(topology, flows)?;
    let scheduler: Box<dyn Scheduler> = match args.scheduler {
        SchedulerKind::Fixed => Box::new(FixedScheduler::new(&net, &ChoiceParams::from_env()?)),
        SchedulerKind::Random => {
            Box::new(RandomizedScheduler::new(&net, &ChoiceParams::from_env()?))
        }
        SchedulerKind::Capacity => {
            Box::new(CapacityScheduler::new(&net, &CapacityParams::from_env()?))
        }
    };

    let mut sim = Simulator::new(net, scheduler)?;
    if args.sample {
        sim.enable_sampling();
    }
    if args.trace_json.is_some() {
        sim.enable_trace();
    }
    sim.begin();
    sim.run(args.steps);

    if let Some(path) = &args.trace_json {
        let records = sim.take_trace().unwrap_or_default();
        fs::write(path, serde_json::to_string_pretty(&records)?)?;
    }

    let stats = sim.stats();
    println!(
        "done @ step {}, phase {}, buffered={}, injected={}, delivered={}, did_overflow={}",
        sim.current_step(),
        sim.current_phase(),
        sim.net().buffers.packets_in_network(),
        stats.injected_pkts,
        stats.delivered_pkts,
        sim.did_overflow()
    );
    if let Some(sampler) = sim.sampler() {
        println!(
            "latency max={} avg={}",
            sampler.max_latency(),
            sampler.average_latency()
        );
    }
    Ok(())
}

fn main() {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("rotor_sim error: {e}");
        std::process::exit(1);
    }
}
