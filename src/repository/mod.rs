// ==========================================
// 集装箱堆场排位系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 模拟结果落库，供图表层读取
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod simulation_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use simulation_repo::{SimRunSummary, SimulationRepository, StaticAllocationRow};
