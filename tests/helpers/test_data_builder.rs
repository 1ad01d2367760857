// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use container_yard_aps::config::SimulationConfig;
use container_yard_aps::domain::snapshot::DaySnapshot;
use container_yard_aps::domain::types::Berth;
use container_yard_aps::domain::vessel::{VesselRecord, VesselState};
use container_yard_aps::domain::yard::YardLayout;
use container_yard_aps::engine::VesselScheduleBuilder;
use rusqlite::Connection;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// 2026 年 9 月的某日
pub fn sep(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
}

// ==========================================
// VesselRecord 构建器
// ==========================================

pub struct VesselBuilder {
    vessel: String,
    total_containers: f64,
    cluster_need: i64,
    eta: NaiveDate,
    berth: Berth,
}

impl VesselBuilder {
    pub fn new(vessel: &str) -> Self {
        Self {
            vessel: vessel.to_string(),
            total_containers: 100.0,
            cluster_need: 1,
            eta: sep(15),
            berth: Berth::NP1,
        }
    }

    pub fn total(mut self, total: f64) -> Self {
        self.total_containers = total;
        self
    }

    pub fn clusters(mut self, hint: i64) -> Self {
        self.cluster_need = hint;
        self
    }

    pub fn eta(mut self, eta: NaiveDate) -> Self {
        self.eta = eta;
        self
    }

    pub fn berth(mut self, berth: Berth) -> Self {
        self.berth = berth;
        self
    }

    pub fn build(self) -> VesselRecord {
        VesselRecord::new(
            self.vessel,
            self.total_containers,
            self.cluster_need,
            self.eta,
            self.berth,
        )
    }

    /// 按默认参数构建模拟状态
    pub fn build_state(self) -> VesselState {
        VesselScheduleBuilder::new(&SimulationConfig::default()).build_one(&self.build())
    }
}

// ==========================================
// 堆场 / 快照
// ==========================================

/// 单箱区小堆场
pub fn single_block_layout(block: &str, slot_count: u32, capacity: u32) -> YardLayout {
    YardLayout::default().with_block(block, slot_count, capacity)
}

/// 快照中每个槽位都不超容，且 total 与明细一致
pub fn assert_snapshot_within_capacity(snapshot: &DaySnapshot) {
    for slot in &snapshot.slots {
        let detail: u32 = slot.clusters.values().sum();
        assert_eq!(detail, slot.total, "{} {} 明细不一致", snapshot.date, slot.slot_id);
        assert!(
            slot.total <= slot.capacity,
            "{} {} 超容: {} > {}",
            snapshot.date,
            slot.slot_id,
            slot.total,
            slot.capacity
        );
    }
}

// ==========================================
// 文件 / 数据库
// ==========================================

/// 写入临时 CSV 文件
pub fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

/// 内存数据库（已配置 PRAGMA）
pub fn in_memory_conn() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    container_yard_aps::db::configure_sqlite_connection(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}
