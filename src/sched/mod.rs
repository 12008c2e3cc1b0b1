//! 调度器模块
//!
//! 三种策略共享路由核心：fixed（按目的缓存的单一选择）、
//! randomized（随机多路径）、capacity（容量感知多路径）。

// 子模块声明
mod capacity;
mod fixed;
mod random;
mod router;

// 重新导出公共接口
pub use capacity::CapacityScheduler;
pub use fixed::FixedScheduler;
pub use random::RandomizedScheduler;
pub use router::{ChoiceTable, RankedChoice};

use crate::net::{FlowId, Network, NodeId, PortId};

/// 调度选择：进来的包放到哪个端口、提交到哪个相位发送。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleChoice {
    pub port: PortId,
    pub phase: usize,
}

/// 调度器接口。
///
/// 约定：两次 `prepare_choices` 之间，相同参数的 `choice` 必须返回相同结果；
/// 返回的端口必须由查询节点拥有。
pub trait Scheduler {
    /// 每次 run 开始时调用（重置内部 PRNG 等）。
    fn begin(&mut self);

    /// 每个仿真 step 开始时调用一次。
    fn prepare_choices(&mut self);

    /// 为 (phase, node, flow) 给出转发选择。
    fn choice(&mut self, phase: usize, node: NodeId, flow: FlowId, net: &Network)
        -> ScheduleChoice;
}
