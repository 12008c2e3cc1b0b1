mod config;
mod router;
mod simulator;
mod topology;

use crate::net::{Flow, Network, NodeId, Packets, Topology};
use crate::topo::{build_rotor, RotorOpts};

/// Reference rotor instance: P=4, N=5, 2 ports per node.
pub(crate) fn rotor_topology(capacity: Packets, bandwidth: Packets) -> Topology {
    build_rotor(&RotorOpts {
        capacity,
        bandwidth,
        ..RotorOpts::default()
    })
}

pub(crate) fn rotor_network(
    capacity: Packets,
    bandwidth: Packets,
    flows: Vec<Flow>,
) -> Network {
    Network::new(rotor_topology(capacity, bandwidth), flows).expect("valid rotor network")
}

/// Single-path topology: P phases, two nodes, port 0 always 0->1,
/// port 1 always 1->0.
pub(crate) fn two_node_network(
    num_phases: usize,
    capacity: Packets,
    bandwidth: Packets,
    flows: Vec<Flow>,
) -> Network {
    let mut topology = Topology::new(num_phases, 2, 2);
    topology.set_owners(&[NodeId(0), NodeId(1)]);
    topology.set_capacities(&[capacity, capacity]);
    topology.set_bandwidths(&[bandwidth, bandwidth]);
    for phase in 0..num_phases {
        topology.set_phase_targets(phase, &[NodeId(1), NodeId(0)]);
    }
    Network::new(topology, flows).expect("valid two-node network")
}
