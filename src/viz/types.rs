//! 追踪数据类型

use serde::Serialize;

/// 单步追踪记录：step 执行结束时的网络摘要快照。
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// 执行该步时的步号
    pub step: u64,
    /// 执行该步时的相位
    pub phase: usize,
    /// 网内缓冲包总数
    pub buffered: i64,
    /// 本步所有端口的发送量
    pub sent: i64,
    /// 累计注入
    pub injected: i64,
    /// 累计送达
    pub delivered: i64,
    pub did_overflow: bool,
}
