use crate::net::{Flow, Network, NetworkBuilder, NodeId, PortId, Topology, TopologyError};
use crate::topo::{build_rotor, RotorOpts};

use super::rotor_topology;

// Reference rotation table for P=4, N=5, 2 ports per node.
const REFERENCE: [[usize; 10]; 4] = [
    [1, 3, 2, 4, 3, 0, 4, 1, 0, 2],
    [2, 4, 3, 0, 4, 1, 0, 2, 1, 3],
    [3, 1, 4, 2, 0, 3, 1, 4, 2, 0],
    [4, 2, 0, 3, 1, 4, 2, 0, 3, 1],
];

#[test]
fn rotor_generator_matches_reference_table() {
    let topology = rotor_topology(16, 4);
    assert_eq!(topology.num_phases(), 4);
    assert_eq!(topology.num_nodes(), 5);
    assert_eq!(topology.num_ports(), 10);
    for phase in 0..4 {
        for port in 0..10 {
            assert_eq!(
                topology.target(phase, PortId(port)),
                NodeId(REFERENCE[phase][port]),
                "target mismatch at phase {phase} port {port}"
            );
        }
    }
    for port in 0..10 {
        assert_eq!(topology.owner(PortId(port)), NodeId(port / 2));
    }
}

#[test]
fn rotor_topology_has_no_self_loops() {
    for nodes in [2, 3, 5, 8] {
        let topology = build_rotor(&RotorOpts {
            num_phases: 4,
            num_nodes: nodes,
            ports_per_node: 2,
            capacity: 8,
            bandwidth: 2,
        });
        topology.validate().expect("rotor must be self-loop free");
    }
}

#[test]
fn validate_rejects_self_loop() {
    let mut topology = Topology::new(2, 2, 1);
    topology.set_owners(&[NodeId(0)]);
    topology.set_phase_targets(0, &[NodeId(1)]);
    topology.set_phase_targets(1, &[NodeId(0)]); // port targets its own owner
    assert_eq!(
        topology.validate(),
        Err(TopologyError::SelfLoop {
            phase: 1,
            port: 0,
            node: 0
        })
    );
}

#[test]
fn network_rejects_self_flow() {
    let topology = rotor_topology(16, 4);
    let err = Network::new(topology, vec![Flow::new(NodeId(2), NodeId(2), 1)]).unwrap_err();
    assert_eq!(err, TopologyError::SelfFlow { flow: 0, node: 2 });
}

#[test]
fn phase_add_wraps() {
    let topology = rotor_topology(16, 4);
    assert_eq!(topology.phase_add(3, 1), 0);
    assert_eq!(topology.phase_add(2, 4), 2);
    assert_eq!(topology.phase_add(0, 7), 3);
}

#[test]
fn find_owned_port_returns_first_owned() {
    let topology = rotor_topology(16, 4);
    assert_eq!(topology.find_owned_port(NodeId(0)), PortId(0));
    assert_eq!(topology.find_owned_port(NodeId(3)), PortId(6));
}

#[test]
fn builder_happy_path_matches_direct_construction() {
    let reference = rotor_topology(16, 4);

    let mut builder = NetworkBuilder::new();
    builder.basic_params(4, 5, 1, 10);
    builder.port_capacities(&[16; 10]).unwrap();
    builder.port_bandwidths(&[4; 10]).unwrap();
    let owners: Vec<NodeId> = (0..10).map(|p| NodeId(p / 2)).collect();
    builder.push_port_owners(&owners).unwrap();
    builder.push_flow(0, NodeId(0), NodeId(3), 1).unwrap();
    for phase in 0..4 {
        let row: Vec<NodeId> = REFERENCE[phase].iter().map(|&n| NodeId(n)).collect();
        builder.push_topology(phase, &row).unwrap();
    }
    let net = builder.build().expect("complete ingestion builds");

    for phase in 0..4 {
        for port in 0..10 {
            assert_eq!(
                net.topology.target(phase, PortId(port)),
                reference.target(phase, PortId(port))
            );
        }
    }
    assert_eq!(net.num_flows(), 1);
    assert_eq!(net.buffers.num_phases(), 4);
    assert_eq!(net.buffers.num_ports(), 10);
    assert_eq!(net.buffers.num_flows(), 1);
}

#[test]
fn builder_rejects_ingestion_before_params() {
    let mut builder = NetworkBuilder::new();
    assert!(builder.port_capacities(&[1]).is_err());
}

#[test]
fn builder_rejects_wrong_row_length() {
    let mut builder = NetworkBuilder::new();
    builder.basic_params(2, 2, 0, 2);
    assert!(builder.port_capacities(&[1, 2, 3]).is_err());
}

#[test]
fn builder_rejects_missing_flow() {
    let mut builder = NetworkBuilder::new();
    builder.basic_params(1, 2, 1, 2);
    builder.port_capacities(&[4, 4]).unwrap();
    builder.port_bandwidths(&[1, 1]).unwrap();
    builder.push_port_owners(&[NodeId(0), NodeId(1)]).unwrap();
    builder
        .push_topology(0, &[NodeId(1), NodeId(0)])
        .unwrap();
    // flow 0 never pushed
    assert!(builder.build().is_err());
}
