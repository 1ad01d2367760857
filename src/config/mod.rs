// ==========================================
// 集装箱堆场排位系统 - 配置层
// ==========================================
// 职责: 模拟参数与堆场拓扑配置，支持 config_kv 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod simulation_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use simulation_config::{RateModel, SimulationConfig};
