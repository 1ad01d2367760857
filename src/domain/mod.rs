// ==========================================
// 集装箱堆场排位系统 - 领域模型层
// ==========================================
// 职责: 定义堆场、船舶、事件、快照等领域实体
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod event;
pub mod snapshot;
pub mod types;
pub mod vessel;
pub mod yard;

// 重导出核心类型
pub use event::{EventLog, YardEvent};
pub use snapshot::{DaySnapshot, SlotSnapshot};
pub use types::{Berth, EventKind, StaticSlotOrder, VesselPhase};
pub use vessel::{Cluster, VesselRecord, VesselState};
pub use yard::{BlockEntry, BlockSpec, Slot, Yard, YardLayout};
