//! 延迟采样
//!
//! 每条流跟踪一个带标记的包：注入队列 → 端口间跳转 → egress，
//! 输出其端到端延迟（相位步数）。latency 为 -1 表示尚未解析。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::net::{Flow, FlowId, Network, NodeId, Packets, PortId};
use crate::sched::{ScheduleChoice, Scheduler};

/// 每次 begin 重置的固定种子
const RESEED: u64 = 123456;

/// 注入位置基准：假定约 50 步后进入稳态
const STEPS_TO_STABLE: f64 = 50.0;

/// 每条流一个标记包的采样状态。
#[derive(Debug)]
pub struct Sampler {
    /// 标记包在网外注入队列中的位置（前面还有多少包）
    intro_index: Vec<i64>,
    /// 入网步号，-1 未入网
    entry_step: Vec<i64>,
    /// 在当前 (port, phase) 桶中的位置（其后排队的包数），-1 未入网/已解析
    position: Vec<i64>,
    port: Vec<PortId>,
    phase: Vec<usize>,
    /// 结果延迟，-1 未解析
    latency: Vec<i64>,
    rng: StdRng,
}

impl Sampler {
    pub fn new(flows: &[Flow]) -> Self {
        let mut sampler = Self {
            intro_index: Vec::new(),
            entry_step: Vec::new(),
            position: Vec::new(),
            port: Vec::new(),
            phase: Vec::new(),
            latency: Vec::new(),
            rng: StdRng::seed_from_u64(RESEED),
        };
        sampler.begin(flows);
        sampler
    }

    /// 重置并重新抽取每条流的注入位置。
    pub fn begin(&mut self, flows: &[Flow]) {
        self.rng = StdRng::seed_from_u64(RESEED);
        let n = flows.len();
        self.latency = vec![-1; n];
        self.entry_step = vec![-1; n];
        self.position = vec![-1; n];
        self.port = vec![PortId(0); n];
        self.phase = vec![0; n];
        let intro: Vec<i64> = flows
            .iter()
            .map(|f| {
                (f.amount as f64 * STEPS_TO_STABLE + self.rng.gen_range(0.0..70.0)).round() as i64
            })
            .collect();
        self.intro_index = intro;
    }

    pub fn port(&self, flow: FlowId) -> PortId {
        self.port[flow.0]
    }

    pub fn phase(&self, flow: FlowId) -> usize {
        self.phase[flow.0]
    }

    pub fn latency(&self, flow: FlowId) -> i64 {
        self.latency[flow.0]
    }

    pub fn max_latency(&self) -> f64 {
        self.latency.iter().fold(0.0, |m, &l| f64::max(m, l as f64))
    }

    pub fn average_latency(&self) -> f64 {
        let total: i64 = self.latency.iter().sum();
        total as f64 / self.latency.len() as f64
    }

    /// 注入回调：`choice` 是本步注入所用的选择，缓冲已包含刚加入的 `amount`。
    pub fn on_ingress_added(
        &mut self,
        flow: FlowId,
        amount: Packets,
        choice: ScheduleChoice,
        current_step: u64,
        net: &Network,
    ) {
        let f = flow.0;
        if self.intro_index[f] < 0 {
            return; // 标记包已入网
        }
        self.intro_index[f] -= amount;
        if self.intro_index[f] < 0 {
            // 刚入网。intro_index 此刻非正：-1 表示是最后入网的那个。
            // 其队列位置 = 桶内现有量 + 非正下标。
            self.position[f] = net.buffers.get(choice.phase, choice.port, flow) + self.intro_index[f];
            self.entry_step[f] = current_step as i64;
            self.port[f] = choice.port;
            self.phase[f] = choice.phase;
            trace!(
                flow = f,
                position = self.position[f],
                step = current_step,
                "标记包入网"
            );
        }
    }

    /// 端口发送回调：在缓冲更新之后、注入之前调用。
    pub fn on_port_transfer(
        &mut self,
        phase: usize,
        flow: FlowId,
        p_sender: PortId,
        dest: NodeId,
        amount: Packets,
        current_step: u64,
        net: &Network,
        scheduler: &mut dyn Scheduler,
    ) {
        let f = flow.0;
        if p_sender != self.port[f] {
            return; // 标记包不在该端口
        }
        if phase != self.phase[f] {
            return; // 不在本相位发送
        }
        if self.latency[f] != -1 || self.position[f] < 0 {
            return;
        }
        self.position[f] -= amount;
        if self.position[f] < 0 {
            // 标记包离开该端口
            if dest == net.flows[f].egress {
                self.latency[f] = current_step as i64 - self.entry_step[f];
                self.position[f] = -1;
                trace!(flow = f, latency = self.latency[f], "标记包离网");
            } else {
                // 去往下一个端口：新位置 = 新桶现有量 + 负的剩余位置
                let choice = scheduler.choice(phase, dest, flow, net);
                self.position[f] = net.buffers.get(choice.phase, choice.port, flow) + self.position[f];
                self.port[f] = choice.port;
                self.phase[f] = choice.phase;
            }
        }
    }

    /// 重调度回调：`dest_buffered_before` 是目标桶搬移前的占用。
    pub fn on_reschedule(
        &mut self,
        flow: FlowId,
        choice: ScheduleChoice,
        dest_buffered_before: Packets,
    ) {
        let f = flow.0;
        let changing = choice.port != self.port[f] || choice.phase != self.phase[f];
        if changing && self.latency[f] == -1 && self.entry_step[f] != -1 {
            self.position[f] = dest_buffered_before + self.position[f];
            self.port[f] = choice.port;
            self.phase[f] = choice.phase;
        }
    }
}
