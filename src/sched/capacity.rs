//! 容量感知多路径调度
//!
//! 按代价序扫描候选，返回第一个总负载低于阈值 τ 的端口；
//! 都不合格时取代价最低者。读取查询时刻的缓冲快照，不用 PRNG。

use crate::config::CapacityParams;
use crate::net::{FlowId, Network, NodeId};

use super::router::ChoiceTable;
use super::{ScheduleChoice, Scheduler};

pub struct CapacityScheduler {
    tables: Vec<ChoiceTable>,
    flow_table: Vec<usize>,
    threshold: f64,
}

impl CapacityScheduler {
    pub fn new(net: &Network, params: &CapacityParams) -> Self {
        let (tables, flow_table) = ChoiceTable::per_egress(net, params.policy, params.num_paths);
        Self {
            tables,
            flow_table,
            threshold: params.threshold,
        }
    }
}

impl Scheduler for CapacityScheduler {
    fn begin(&mut self) {}

    fn prepare_choices(&mut self) {}

    fn choice(
        &mut self,
        phase: usize,
        node: NodeId,
        flow: FlowId,
        net: &Network,
    ) -> ScheduleChoice {
        let list = self.tables[self.flow_table[flow.0]].get(phase, node);
        assert!(
            !list.is_empty(),
            "no schedule choice for phase {} node {}",
            phase,
            node.0
        );
        let below = list
            .iter()
            .find(|c| net.total_port_load(c.port) < self.threshold);
        // 没有合格者时取第一个（代价最低）候选
        below.unwrap_or(&list[0]).choice()
    }
}
