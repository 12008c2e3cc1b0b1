//! 运行参数
//!
//! 从环境变量读取调度参数。非法取值是致命配置错误。
//! 变量名沿用既有接口约定（包括 `CAPACITY_TRESHOLD` 的历史拼写）。

use std::env;

use thiserror::Error;

use crate::graph::CostPolicy;

/// 配置错误：setup 阶段致命。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{var}: unknown approach {value:?} (expected QUICKEST or FEWEST_HOPS)")]
    BadApproach { var: &'static str, value: String },
    #[error("{var}: num paths {value:?} out of range 1..=8")]
    BadNumPaths { var: &'static str, value: String },
    #[error("{var}: threshold {value:?} out of range (0, 100]")]
    BadThreshold { var: &'static str, value: String },
}

/// fixed / randomized 变体的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceParams {
    pub policy: CostPolicy,
    pub num_paths: usize,
}

impl Default for ChoiceParams {
    fn default() -> Self {
        Self {
            policy: CostPolicy::Quickest,
            num_paths: 2,
        }
    }
}

impl ChoiceParams {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut params = Self::default();
        if let Some(value) = lookup("CHOICE_APPROACH") {
            params.policy = parse_approach("CHOICE_APPROACH", &value)?;
        }
        if let Some(value) = lookup("CHOICE_NUM_PATHS") {
            params.num_paths = parse_num_paths("CHOICE_NUM_PATHS", &value)?;
        }
        Ok(params)
    }
}

/// capacity 变体的参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityParams {
    pub policy: CostPolicy,
    pub num_paths: usize,
    /// 候选端口合格的总负载阈值 τ（容量分数，跨相位求和）
    pub threshold: f64,
}

impl Default for CapacityParams {
    fn default() -> Self {
        Self {
            policy: CostPolicy::Quickest,
            num_paths: 2,
            threshold: 0.7,
        }
    }
}

impl CapacityParams {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut params = Self::default();
        if let Some(value) = lookup("CAPACITY_APPROACH") {
            params.policy = parse_approach("CAPACITY_APPROACH", &value)?;
        }
        if let Some(value) = lookup("CAPACITY_NUM_PATHS") {
            params.num_paths = parse_num_paths("CAPACITY_NUM_PATHS", &value)?;
        }
        if let Some(value) = lookup("CAPACITY_TRESHOLD") {
            params.threshold = parse_threshold("CAPACITY_TRESHOLD", &value)?;
        }
        Ok(params)
    }
}

fn parse_approach(var: &'static str, value: &str) -> Result<CostPolicy, ConfigError> {
    match value {
        "QUICKEST" => Ok(CostPolicy::Quickest),
        "FEWEST_HOPS" => Ok(CostPolicy::FewestHops),
        _ => Err(ConfigError::BadApproach {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_num_paths(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=8).contains(n))
        .ok_or(ConfigError::BadNumPaths {
            var,
            value: value.to_string(),
        })
}

fn parse_threshold(var: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|t| *t > 0.0 && *t <= 100.0)
        .ok_or(ConfigError::BadThreshold {
            var,
            value: value.to_string(),
        })
}
