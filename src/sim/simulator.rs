//! 相位步进仿真器
//!
//! 确定性状态机，每步依次：prepare → 计算发送 → 路由接收 → 应用增量 →
//! 采样转移 → 可选重调度 → 注入 → 溢出检测 → 推进相位。
//! sent / recv 使用独立暂存数组，先算后改，避免读写竞争；
//! setup 时分配一次，稳态不再分配。

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::net::{Buffers, FlowId, Network, NodeId, Packets, PortId, Stats, TopologyError};
use crate::sched::Scheduler;
use crate::viz::{StepRecord, StepTrace};

use super::sampler::Sampler;

/// 仿真器 setup 阶段的致命错误。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    /// 调度器违反端口归属后置条件
    #[error("scheduler chose port {port} not owned by node {node} (phase {phase}, flow {flow})")]
    BadChoice {
        phase: usize,
        node: usize,
        port: usize,
        flow: usize,
    },
}

/// 相位步进仿真器：拥有网络状态与调度器。
pub struct Simulator {
    net: Network,
    scheduler: Box<dyn Scheduler>,
    current_phase: usize,
    current_step: u64,
    did_overflow: bool,
    /// 各端口上一步的发送量
    last_sent: Vec<Packets>,
    max_send_from_port_in_phase: Packets,
    stats: Stats,
    /// 发送 / 接收暂存
    sent: Buffers,
    recv: Buffers,
    /// 重调度暂存增量，`phase * Q + port`
    resched_deltas: Vec<Packets>,
    /// 各相位是否启用重调度（基线全关）
    reschedule_on: Vec<bool>,
    sampler: Option<Sampler>,
    trace_sink: Option<StepTrace>,
}

impl Simulator {
    /// 校验拓扑与调度器后构造。构造完成即处于 begin 后的就绪状态。
    pub fn new(net: Network, scheduler: Box<dyn Scheduler>) -> Result<Self, SimError> {
        net.topology.validate()?;
        for (i, f) in net.flows.iter().enumerate() {
            if f.ingress == f.egress {
                return Err(SimError::Topology(TopologyError::SelfFlow {
                    flow: i,
                    node: f.ingress.0,
                }));
            }
        }

        let num_phases = net.topology.num_phases();
        let num_ports = net.topology.num_ports();
        let num_flows = net.num_flows();
        let mut sim = Self {
            sent: Buffers::new(num_phases, num_ports, num_flows),
            recv: Buffers::new(num_phases, num_ports, num_flows),
            resched_deltas: vec![0; num_phases * num_ports],
            reschedule_on: vec![false; num_phases],
            last_sent: vec![0; num_ports],
            max_send_from_port_in_phase: 0,
            current_phase: 0,
            current_step: 0,
            did_overflow: false,
            stats: Stats::default(),
            sampler: None,
            trace_sink: None,
            net,
            scheduler,
        };
        sim.verify_scheduler()?;
        sim.begin();
        Ok(sim)
    }

    /// 所有 (phase, node, flow) 的选择都必须落在查询节点自己的端口上。
    fn verify_scheduler(&mut self) -> Result<(), SimError> {
        self.scheduler.prepare_choices();
        for f in 0..self.net.num_flows() {
            for phase in 0..self.net.topology.num_phases() {
                for node in 0..self.net.topology.num_nodes() {
                    let choice =
                        self.scheduler
                            .choice(phase, NodeId(node), FlowId(f), &self.net);
                    if self.net.topology.owner(choice.port) != NodeId(node) {
                        return Err(SimError::BadChoice {
                            phase,
                            node,
                            port: choice.port.0,
                            flow: f,
                        });
                    }
                }
            }
        }
        debug!("调度器后置条件校验通过");
        Ok(())
    }

    /// 开始一次新的 run：清零缓冲、重置相位与统计、重置 PRNG。
    pub fn begin(&mut self) {
        self.net.buffers.fill(0);
        self.current_phase = 0;
        self.current_step = 0;
        self.did_overflow = false;
        self.last_sent.fill(0);
        self.max_send_from_port_in_phase = 0;
        self.stats = Stats::default();
        self.scheduler.begin();
        if let Some(sampler) = self.sampler.as_mut() {
            sampler.begin(&self.net.flows);
        }
        if let Some(sink) = self.trace_sink.as_mut() {
            sink.clear();
        }
    }

    /// 打开延迟采样
    pub fn enable_sampling(&mut self) {
        self.sampler = Some(Sampler::new(&self.net.flows));
    }

    /// 在指定相位启用重调度
    pub fn enable_reschedule(&mut self, phase: usize) {
        self.reschedule_on[phase] = true;
    }

    /// 打开按步追踪
    pub fn enable_trace(&mut self) {
        self.trace_sink = Some(StepTrace::default());
    }

    pub fn take_trace(&mut self) -> Option<Vec<StepRecord>> {
        self.trace_sink.take().map(StepTrace::into_records)
    }

    pub fn net(&self) -> &Network {
        &self.net
    }

    /// 可变访问网络状态（宿主镜像缓冲等场景）。
    pub fn net_mut(&mut self) -> &mut Network {
        &mut self.net
    }

    pub fn current_phase(&self) -> usize {
        self.current_phase
    }

    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn did_overflow(&self) -> bool {
        self.did_overflow
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn last_sent(&self, port: PortId) -> Packets {
        self.last_sent[port.0]
    }

    /// 单端口单相位的历史最大发送量
    pub fn max_send_from_port_in_phase(&self) -> Packets {
        self.max_send_from_port_in_phase
    }

    pub fn sampler(&self) -> Option<&Sampler> {
        self.sampler.as_ref()
    }

    /// 端口带宽利用率：上一步发送量与带宽之比。
    pub fn port_utilization(&self, port: PortId) -> f64 {
        self.last_sent[port.0] as f64 / self.net.topology.bandwidth(port) as f64
    }

    /// 执行若干步。
    pub fn run(&mut self, steps: u64) {
        info!(steps, "开始仿真");
        for _ in 0..steps {
            self.step();
        }
        info!(
            step = self.current_step,
            did_overflow = self.did_overflow,
            buffered = self.net.buffers.packets_in_network(),
            "仿真结束"
        );
    }

    /// 某流某端口在当前相位的公平份额发送量。
    /// 各流按占用成比例分享 min(bandwidth, buffered)。
    fn sending(&self, phase: usize, port: PortId, flow: FlowId, buffered: Packets) -> Packets {
        if buffered == 0 {
            return 0;
        }
        let to_send = self.net.topology.bandwidth(port).min(buffered);
        let share = self.net.buffers.get(phase, port, flow) as f64
            * (to_send as f64 / buffered as f64);
        share.round() as Packets
    }

    /// 执行一个相位步。
    pub fn step(&mut self) {
        let i = self.current_phase;
        trace!(step = self.current_step, phase = i, "相位步开始");

        self.scheduler.prepare_choices();

        // 计算发送（只有当前相位的桶发送）
        self.sent.fill(0);
        self.recv.fill(0);
        for p in 0..self.net.topology.num_ports() {
            let port = PortId(p);
            let buffered = self.net.buffers.port_buffered(i, port);
            let mut port_sending: Packets = 0;
            for f in 0..self.net.num_flows() {
                let flow = FlowId(f);
                let f_sending = self.sending(i, port, flow, buffered);
                port_sending += f_sending;
                *self.sent.get_mut(i, port, flow) = f_sending;
            }
            self.last_sent[p] = port_sending;
            self.max_send_from_port_in_phase = self.max_send_from_port_in_phase.max(port_sending);
        }

        // 计算接收：目的是 egress 的包直接离网
        for f in 0..self.net.num_flows() {
            let flow = FlowId(f);
            let egress = self.net.flows[f].egress;
            for p in 0..self.net.topology.num_ports() {
                let port = PortId(p);
                let sent = self.sent.get(i, port, flow);
                let dest = self.net.topology.target(i, port);
                if dest == egress {
                    self.stats.delivered_pkts += sent;
                    continue;
                }
                let choice = self.scheduler.choice(i, dest, flow, &self.net);
                *self.recv.get_mut(choice.phase, choice.port, flow) += sent;
            }
        }

        // 应用增量
        for j in 0..self.net.topology.num_phases() {
            for p in 0..self.net.topology.num_ports() {
                for f in 0..self.net.num_flows() {
                    let delta = self.recv.get(j, PortId(p), FlowId(f))
                        - self.sent.get(j, PortId(p), FlowId(f));
                    *self.net.buffers.get_mut(j, PortId(p), FlowId(f)) += delta;
                }
            }
        }

        // 采样包转移：缓冲更新之后、注入之前
        if let Some(sampler) = self.sampler.as_mut() {
            for f in 0..self.net.flows.len() {
                let flow = FlowId(f);
                let p_sender = sampler.port(flow);
                let dest = self.net.topology.target(i, p_sender);
                let amount = self.sent.get(i, p_sender, flow);
                sampler.on_port_transfer(
                    i,
                    flow,
                    p_sender,
                    dest,
                    amount,
                    self.current_step,
                    &self.net,
                    &mut *self.scheduler,
                );
            }
        }

        // 可选重调度
        if self.reschedule_on[i] {
            self.reschedule(i);
        }

        // 注入
        for f in 0..self.net.flows.len() {
            let flow = FlowId(f);
            let ingress = self.net.flows[f].ingress;
            let amount = self.net.flows[f].amount;
            let choice = self.scheduler.choice(i, ingress, flow, &self.net);
            *self.net.buffers.get_mut(choice.phase, choice.port, flow) += amount;
            self.stats.injected_pkts += amount;
            if let Some(sampler) = self.sampler.as_mut() {
                sampler.on_ingress_added(flow, amount, choice, self.current_step, &self.net);
            }
        }

        // 溢出检测：置位后继续运行，由调用方读取标志
        self.update_valid_state();

        // 推进
        self.current_step += 1;
        self.current_phase = (self.current_phase + 1) % self.net.topology.num_phases();

        if self.trace_sink.is_some() {
            let record = StepRecord {
                step: self.current_step - 1,
                phase: i,
                buffered: self.net.buffers.packets_in_network(),
                sent: self.last_sent.iter().sum(),
                injected: self.stats.injected_pkts,
                delivered: self.stats.delivered_pkts,
                did_overflow: self.did_overflow,
            };
            if let Some(sink) = self.trace_sink.as_mut() {
                sink.push(record);
            }
        }
    }

    /// 把 `phase` 相位的所有缓冲桶迁移到调度器当前给出的目标桶。
    /// 对每条流独立进行；增量先暂存再应用，避免 A 迁到 B、B 又迁回 A
    /// 之类的迁移链观察到部分更新。
    pub fn reschedule(&mut self, phase: usize) {
        let num_ports = self.net.topology.num_ports();
        let num_phases = self.net.topology.num_phases();
        debug!(phase, "重调度");

        for f in 0..self.net.flows.len() {
            let flow = FlowId(f);

            // 采样包的迁移目标需在搬移前确定
            let mut sample_choice = None;
            if let Some(sampler) = &self.sampler {
                let at_node = self.net.topology.owner(sampler.port(flow));
                sample_choice = Some(self.scheduler.choice(phase, at_node, flow, &self.net));
            }

            self.resched_deltas.fill(0);
            for p in 0..num_ports {
                let port = PortId(p);
                let remaining = self.net.buffers.get(phase, port, flow);
                let owner = self.net.topology.owner(port);
                let choice = self.scheduler.choice(phase, owner, flow, &self.net);
                assert_eq!(
                    self.net.topology.owner(choice.port),
                    owner,
                    "rescheduled bucket must stay on its owning node"
                );
                self.resched_deltas[choice.phase * num_ports + choice.port.0] += remaining;
                self.resched_deltas[phase * num_ports + p] -= remaining;
            }

            // 位置换算用搬移前的目标桶占用
            let dest_before =
                sample_choice.map(|c| self.net.buffers.get(c.phase, c.port, flow));
            for j in 0..num_phases {
                for p in 0..num_ports {
                    *self.net.buffers.get_mut(j, PortId(p), flow) +=
                        self.resched_deltas[j * num_ports + p];
                }
            }

            if let (Some(choice), Some(before)) = (sample_choice, dest_before) {
                if let Some(sampler) = self.sampler.as_mut() {
                    sampler.on_reschedule(flow, choice, before);
                }
            }
        }
    }

    /// 任一端口总缓冲超容量即置溢出标志（状态失效但继续仿真）。
    fn update_valid_state(&mut self) -> bool {
        for p in 0..self.net.topology.num_ports() {
            let port = PortId(p);
            if self.net.buffers.total_port_buffered(port) > self.net.topology.capacity(port) {
                debug!(port = p, "端口缓冲超出容量");
                self.did_overflow = true;
                return false;
            }
        }
        true
    }
}
