// ==========================================
// 集装箱堆场排位系统 - 船舶领域模型
// ==========================================
// 职责: 船舶输入记录、簇划分、模拟状态
// 红线: 同一船舶所有簇 size 之和 == total
// ==========================================

use crate::domain::types::{Berth, VesselPhase};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// VesselRecord - 船舶输入记录（导入层输出）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    pub vessel: String,          // 船名（唯一）
    pub total_containers: f64,   // 总箱量（可能为小数）
    pub cluster_need: i64,       // 簇数提示
    pub eta: NaiveDate,          // 到港日期
    pub berth: Berth,            // 泊位
}

impl VesselRecord {
    pub fn new(
        vessel: impl Into<String>,
        total_containers: f64,
        cluster_need: i64,
        eta: NaiveDate,
        berth: Berth,
    ) -> Self {
        Self {
            vessel: vessel.into(),
            total_containers,
            cluster_need,
            eta,
            berth,
        }
    }
}

// ==========================================
// Cluster - 簇
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub label: String, // "{vessel}-C{index}"
    pub size: u32,     // 目标箱量
    pub remain: u32,   // 尚未收入堆场的箱量
}

impl Cluster {
    pub fn new(vessel: &str, index: usize, size: u32) -> Self {
        Self {
            label: format!("{}-C{}", vessel, index),
            size,
            remain: size,
        }
    }
}

// ==========================================
// VesselState - 船舶模拟状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselState {
    pub name: String,
    pub total: u32,
    pub arrival: NaiveDate,
    pub berth: Berth,
    pub cluster_hint: i64,
    pub clusters: Vec<Cluster>,

    // ===== 时间窗口 =====
    pub start_receive: NaiveDate,
    pub end_receive: NaiveDate,
    pub start_load: NaiveDate,
    pub end_load: NaiveDate,
    pub load_days: u32,

    pub done: bool,
}

impl VesselState {
    /// 是否处于收箱窗口（不含到港日）
    pub fn in_receiving_window(&self, day: NaiveDate) -> bool {
        self.start_receive <= day && day <= self.end_receive
    }

    /// 是否处于装船窗口
    pub fn in_loading_window(&self, day: NaiveDate) -> bool {
        self.start_load <= day && day <= self.end_load
    }

    /// 收箱日序号（从 1 开始）
    pub fn receiving_day_number(&self, day: NaiveDate) -> i64 {
        (day - self.start_receive).num_days() + 1
    }

    /// 按日期推导阶段
    ///
    /// 到港日归入 Receiving（补收剩余），装船窗口同日开始；
    /// 到港日之后至 end_load 为 Loading
    pub fn phase_on(&self, day: NaiveDate) -> VesselPhase {
        if self.done || day > self.end_load {
            VesselPhase::Done
        } else if day < self.start_receive {
            VesselPhase::Pending
        } else if day <= self.arrival {
            VesselPhase::Receiving
        } else {
            VesselPhase::Loading
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.total == 0 || self.clusters.is_empty()
    }

    /// 所有簇尚未收入的箱量
    pub fn total_remaining(&self) -> u32 {
        self.clusters.iter().map(|c| c.remain).sum()
    }
}
