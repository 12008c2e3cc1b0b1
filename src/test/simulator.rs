use crate::config::ChoiceParams;
use crate::net::{Flow, FlowId, Network, NodeId, PortId};
use crate::sched::{FixedScheduler, RandomizedScheduler};
use crate::sim::Simulator;

use super::{rotor_network, two_node_network};

fn fixed_sim(net: Network) -> Simulator {
    let scheduler = FixedScheduler::new(&net, &ChoiceParams::default());
    Simulator::new(net, Box::new(scheduler)).expect("valid simulator")
}

fn random_sim(net: Network) -> Simulator {
    let scheduler = RandomizedScheduler::new(&net, &ChoiceParams::default());
    Simulator::new(net, Box::new(scheduler)).expect("valid simulator")
}

#[test]
fn rotor_single_flow_runs_without_overflow() {
    let net = rotor_network(16, 4, vec![Flow::new(NodeId(0), NodeId(3), 1)]);
    let mut sim = fixed_sim(net);
    sim.run(100);
    assert_eq!(sim.current_step(), 100);
    assert!(!sim.did_overflow());
    let stats = sim.stats();
    assert_eq!(stats.injected_pkts, 100);
    assert!(stats.delivered_pkts > 0, "packets must reach the egress");
    // Population stays bounded: injected == delivered + in flight
    assert_eq!(
        stats.injected_pkts,
        stats.delivered_pkts + sim.net().buffers.packets_in_network()
    );
}

#[test]
fn phase_cycles_back_after_a_full_schedule() {
    let net = rotor_network(16, 4, vec![Flow::new(NodeId(0), NodeId(3), 1)]);
    let mut sim = fixed_sim(net);
    assert_eq!(sim.current_phase(), 0);
    for _ in 0..4 {
        sim.step();
    }
    assert_eq!(sim.current_phase(), 0);
    sim.step();
    assert_eq!(sim.current_phase(), 1);
}

#[test]
fn per_step_conservation_holds() {
    let flows = vec![
        Flow::new(NodeId(0), NodeId(3), 2),
        Flow::new(NodeId(1), NodeId(4), 1),
    ];
    let net = rotor_network(64, 4, flows);
    let mut sim = random_sim(net);

    for _ in 0..50 {
        let before = sim.net().buffers.packets_in_network();
        let stats_before = sim.stats();
        sim.step();
        let after = sim.net().buffers.packets_in_network();
        let stats_after = sim.stats();

        let injected = stats_after.injected_pkts - stats_before.injected_pkts;
        let delivered = stats_after.delivered_pkts - stats_before.delivered_pkts;
        assert_eq!(
            after - before,
            injected - delivered,
            "buffer change must equal injected minus delivered"
        );
    }
}

#[test]
fn fair_share_rounding_stays_within_flow_count() {
    // One bucket, three flows with uneven occupancy, bandwidth 3.
    let flows = vec![
        Flow::new(NodeId(0), NodeId(1), 0),
        Flow::new(NodeId(0), NodeId(1), 0),
        Flow::new(NodeId(0), NodeId(1), 0),
    ];
    let net = two_node_network(1, 100, 3, flows);
    let mut sim = fixed_sim(net);

    let occupancy: [i64; 3] = [3, 1, 1];
    for (f, &n) in occupancy.iter().enumerate() {
        *sim.net_mut().buffers.get_mut(0, PortId(0), FlowId(f)) = n;
    }
    let before: Vec<i64> = (0..3)
        .map(|f| sim.net().buffers.get(0, PortId(0), FlowId(f)))
        .collect();

    sim.step();

    // Everything sent goes straight to the egress, so sent = before - after.
    let sent: Vec<i64> = (0..3)
        .map(|f| before[f] - sim.net().buffers.get(0, PortId(0), FlowId(f)))
        .collect();
    let total_sent: i64 = sent.iter().sum();
    let cap = 3.min(5); // min(bandwidth, buffered)
    assert!(
        (total_sent - cap).abs() <= 2,
        "rounding may drift by at most F-1 units, sent {total_sent} vs {cap}"
    );
    for (f, &s) in sent.iter().enumerate() {
        assert!(s >= 0, "flow {f} cannot send more than it buffered");
        assert!(s <= before[f]);
    }
    assert_eq!(sim.stats().delivered_pkts, total_sent);
}

#[test]
fn zero_buffered_port_sends_nothing() {
    let net = two_node_network(1, 10, 5, vec![Flow::new(NodeId(0), NodeId(1), 0)]);
    let mut sim = fixed_sim(net);
    sim.step();
    assert_eq!(sim.last_sent(PortId(0)), 0);
    assert_eq!(sim.stats().delivered_pkts, 0);
}

#[test]
fn overflow_is_flagged_when_injection_exceeds_capacity() {
    // amount = capacity + 1 and nowhere to drain fast enough
    let net = rotor_network(4, 1, vec![Flow::new(NodeId(0), NodeId(3), 5)]);
    let mut sim = fixed_sim(net);
    for _ in 0..4 {
        sim.step();
        if sim.did_overflow() {
            break;
        }
    }
    assert!(
        sim.did_overflow(),
        "overflow must be detected within one schedule"
    );
    // Overflow is non-fatal: the simulation keeps stepping.
    sim.step();
    assert!(sim.did_overflow());
}

#[test]
fn begin_resets_state_for_a_fresh_run() {
    let net = rotor_network(4, 1, vec![Flow::new(NodeId(0), NodeId(3), 5)]);
    let mut sim = fixed_sim(net);
    sim.run(4);
    assert!(sim.did_overflow());

    sim.begin();
    assert!(!sim.did_overflow());
    assert_eq!(sim.current_step(), 0);
    assert_eq!(sim.current_phase(), 0);
    assert_eq!(sim.net().buffers.packets_in_network(), 0);
    assert_eq!(sim.stats().injected_pkts, 0);
}

#[test]
fn randomized_runs_are_reproducible_step_by_step() {
    let flows = vec![
        Flow::new(NodeId(0), NodeId(3), 1),
        Flow::new(NodeId(2), NodeId(4), 1),
    ];
    let net = rotor_network(64, 4, flows);
    let mut sim = random_sim(net);

    let mut record = |sim: &mut Simulator| {
        sim.begin();
        let mut states = Vec::new();
        for _ in 0..200 {
            sim.step();
            states.push(sim.net().buffers.clone());
        }
        states
    };

    let run1 = record(&mut sim);
    let run2 = record(&mut sim);
    assert_eq!(run1, run2, "same seed must give identical trajectories");
}

#[test]
fn reschedule_is_idempotent() {
    let flows = vec![
        Flow::new(NodeId(0), NodeId(3), 1),
        Flow::new(NodeId(1), NodeId(4), 2),
    ];
    let net = rotor_network(64, 4, flows);
    let mut sim = fixed_sim(net);
    sim.run(10);

    sim.reschedule(2);
    let once = sim.net().buffers.clone();
    sim.reschedule(2);
    assert_eq!(
        &sim.net().buffers,
        &once,
        "a second reschedule must not move anything"
    );
}

#[test]
fn reschedule_preserves_packet_counts() {
    let flows = vec![Flow::new(NodeId(0), NodeId(3), 2)];
    let net = rotor_network(64, 4, flows);
    let mut sim = fixed_sim(net);
    sim.run(7);

    let before = sim.net().buffers.packets_in_network();
    sim.reschedule(1);
    assert_eq!(sim.net().buffers.packets_in_network(), before);
}

#[test]
fn step_trace_records_every_step() {
    let net = rotor_network(16, 4, vec![Flow::new(NodeId(0), NodeId(3), 1)]);
    let mut sim = fixed_sim(net);
    sim.enable_trace();
    sim.begin();
    sim.run(12);
    let records = sim.take_trace().expect("trace enabled");
    assert_eq!(records.len(), 12);
    assert_eq!(records[0].step, 0);
    assert_eq!(records[11].step, 11);
    assert_eq!(records[5].phase, 5 % 4);
    assert!(records.iter().all(|r| !r.did_overflow));
}
