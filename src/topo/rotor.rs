//! 全互联 rotor 拓扑构建
//!
//! 每个节点拥有 `ports_per_node` 个端口；端口目标在其余 N-1 个节点上按相位
//! 轮转，同一节点的各端口以相位偏移错开，使任意相位覆盖不同目标。
//! (P=4, N=5, 2 ports/node) 实例与参考测试拓扑一致。

use crate::net::{NodeId, Packets, PortId, Topology};

/// rotor 拓扑配置选项
#[derive(Debug, Clone)]
pub struct RotorOpts {
    pub num_phases: usize,
    pub num_nodes: usize,
    pub ports_per_node: usize,
    /// 每端口容量（包）
    pub capacity: Packets,
    /// 每端口带宽（包/步）
    pub bandwidth: Packets,
}

impl Default for RotorOpts {
    fn default() -> Self {
        Self {
            num_phases: 4,
            num_nodes: 5,
            ports_per_node: 2,
            capacity: 16,
            bandwidth: 4,
        }
    }
}

/// 构建 rotor 拓扑。要求 `num_nodes >= 2`。
pub fn build_rotor(opts: &RotorOpts) -> Topology {
    let n = opts.num_nodes;
    let num_ports = n * opts.ports_per_node;
    let mut topology = Topology::new(opts.num_phases, n, num_ports);

    let owners: Vec<NodeId> = (0..num_ports)
        .map(|p| NodeId(p / opts.ports_per_node))
        .collect();
    topology.set_owners(&owners);
    topology.set_capacities(&vec![opts.capacity; num_ports]);
    topology.set_bandwidths(&vec![opts.bandwidth; num_ports]);

    // 轮转表：节点 k 的第 j 个端口在相位 φ 指向
    // others[(j * (n-1) / ports_per_node + φ) mod (n-1)]，
    // 其中 others 是 k 之后升序排列的其余节点。
    let mut row = vec![NodeId(0); num_ports];
    for phase in 0..opts.num_phases {
        for port in 0..num_ports {
            let owner = port / opts.ports_per_node;
            let slot = port % opts.ports_per_node;
            let offset = slot * (n - 1) / opts.ports_per_node;
            let target = (owner + 1 + (offset + phase) % (n - 1)) % n;
            row[port] = NodeId(target);
        }
        topology.set_phase_targets(phase, &row);
    }
    topology
}

/// 返回某端口在各相位的目标序列（调试辅助）。
pub fn target_cycle(topology: &Topology, port: PortId) -> Vec<NodeId> {
    (0..topology.num_phases())
        .map(|phase| topology.target(phase, port))
        .collect()
}
