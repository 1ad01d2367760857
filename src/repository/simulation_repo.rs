// ==========================================
// 集装箱堆场排位系统 - 模拟结果数据仓储
// ==========================================
// 表: sim_run / sim_event / sim_snapshot_slot / static_allocation
// 红线: Repository 不做业务逻辑，只做数据映射
// ==========================================

mod core;
mod queries;


pub use self::core::{SimRunSummary, SimulationRepository, StaticAllocationRow};
