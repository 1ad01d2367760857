// ==========================================
// 集装箱堆场排位系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 出口箱收箱/装船期间的堆场占用推演
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排位规则与时间线
pub mod engine;

// 导入层 - 船期表
pub mod importer;

// 配置层 - 模拟参数
pub mod config;

// 数据仓储层 - 结果落库
pub mod repository;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Berth, EventKind, StaticSlotOrder, VesselPhase};

// 领域实体
pub use domain::{
    Cluster, DaySnapshot, SlotSnapshot, VesselRecord, VesselState, Yard, YardEvent, YardLayout,
};

// 引擎
pub use engine::{
    ClashTracker, SlotAllocator, StaticAllocationResult, StaticAllocator, TimelineResult,
    TimelineSimulator, VesselScheduleBuilder, YardPlanner,
};

// 配置
pub use config::{ConfigManager, RateModel, SimulationConfig};

// 导入
pub use importer::VesselImporter;

// 仓储
pub use repository::SimulationRepository;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "集装箱堆场排位系统";
