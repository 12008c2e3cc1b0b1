//! 随机多路径调度
//!
//! setup 时按 egress 去重构造 K 路选择表；每个仿真 step 取一个随机数，
//! 用强普适哈希在候选中选择。两次 `prepare_choices` 之间选择保持不变；
//! 每次 begin 以固定种子重置 PRNG，保证全程重放可复现。

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::ChoiceParams;
use crate::net::{FlowId, Network, NodeId};

use super::router::ChoiceTable;
use super::{ScheduleChoice, Scheduler};

/// 每次 begin 重置的固定种子
const RESEED: u64 = 123456;

// 均匀选出的常数，把 x 强普适地哈希到 [0, m)。
// 参见 https://arxiv.org/abs/1504.06804
fn hash_bounded(x: u32, m: u32) -> u32 {
    const A: u64 = 0x28ec0f222c79fb46;
    const B: u64 = 0x2179c594b7d54ca2;
    let h = A.wrapping_mul(x as u64).wrapping_add(B) >> 32;
    ((h * m as u64) >> 32) as u32
}

pub struct RandomizedScheduler {
    tables: Vec<ChoiceTable>,
    /// flow → tables 下标（共享 egress 的流共用一张表）
    flow_table: Vec<usize>,
    rng: StdRng,
    /// 本 step 的随机数
    random_num: u32,
}

impl RandomizedScheduler {
    pub fn new(net: &Network, params: &ChoiceParams) -> Self {
        let (tables, flow_table) = ChoiceTable::per_egress(net, params.policy, params.num_paths);
        Self {
            tables,
            flow_table,
            rng: StdRng::seed_from_u64(RESEED),
            random_num: 0,
        }
    }
}

impl Scheduler for RandomizedScheduler {
    fn begin(&mut self) {
        self.rng = StdRng::seed_from_u64(RESEED);
    }

    fn prepare_choices(&mut self) {
        self.random_num = self.rng.next_u32();
    }

    fn choice(
        &mut self,
        phase: usize,
        node: NodeId,
        flow: FlowId,
        _net: &Network,
    ) -> ScheduleChoice {
        let list = self.tables[self.flow_table[flow.0]].get(phase, node);
        assert!(
            !list.is_empty(),
            "no schedule choice for phase {} node {}",
            phase,
            node.0
        );
        let x = (((phase as u32) << 16).wrapping_add(node.0 as u32)) ^ self.random_num;
        let index = hash_bounded(x, list.len() as u32) as usize;
        list[index].choice()
    }
}
