//! 追踪输出模块
//!
//! 仿真器可选地在每步结束后推送一条摘要记录，供外部序列化分析。

// 子模块声明
mod types;

// 重新导出公共接口
pub use types::StepRecord;

/// 追踪汇：按步累积记录。
#[derive(Debug, Default)]
pub struct StepTrace {
    records: Vec<StepRecord>,
}

impl StepTrace {
    pub fn push(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
