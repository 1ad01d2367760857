// ==========================================
// 集装箱堆场排位系统 - 引擎层
// ==========================================
// 职责: 船期构建、冲突跟踪、槽位分配、时间线模拟、静态排位
// 红线: Engine 不访问数据库；容量不足以数据返回，不抛错误
// ==========================================

pub mod allocator;
pub mod clash;
pub mod orchestrator;
pub mod schedule_builder;
pub mod static_allocator;
pub mod timeline;

// 重导出核心引擎
pub use allocator::{AllocationOutcome, DeallocationOutcome, Placement, SlotAllocator, VesselRef};
pub use clash::{BlockUsage, ClashTracker};
pub use orchestrator::YardPlanner;
pub use schedule_builder::VesselScheduleBuilder;
pub use static_allocator::{StaticAllocationResult, StaticAllocator, StaticSlotEntry};
pub use timeline::{TimelineResult, TimelineSimulator};
