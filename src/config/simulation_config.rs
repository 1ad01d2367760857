// ==========================================
// 集装箱堆场排位系统 - 模拟参数
// ==========================================
// 职责: 收箱/装船/冲突规则的全部常量
// 存储: config_kv 表覆写（见 ConfigManager），缺省值见 Default
// ==========================================

use crate::domain::types::StaticSlotOrder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// RateModel - 收箱速率模型
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateModel {
    /// 固定日收箱比例
    Flat(f64),
    /// 船名 → 收箱日序号(1 起) → 比例；缺失视为 0
    PerVesselDaily(HashMap<String, BTreeMap<i64, f64>>),
}

impl RateModel {
    /// 查询某船第 `day_number` 个收箱日的比例（限定在 0..=1）
    pub fn rate_for(&self, vessel: &str, day_number: i64) -> f64 {
        let rate = match self {
            RateModel::Flat(rate) => *rate,
            RateModel::PerVesselDaily(table) => table
                .get(vessel)
                .and_then(|days| days.get(&day_number))
                .copied()
                .unwrap_or(0.0),
        };

        // 单日最多收满全船
        if rate.is_finite() && rate > 0.0 {
            rate.min(1.0)
        } else {
            0.0
        }
    }
}

impl Default for RateModel {
    fn default() -> Self {
        RateModel::Flat(0.12)
    }
}

// ==========================================
// SimulationConfig - 模拟参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // ===== 时间窗口 =====
    pub receiving_days: i64,       // 到港前收箱天数
    pub simulation_tail_days: i64, // 最晚到港后继续模拟的天数

    // ===== 冲突规则 =====
    pub clash_margin_days: i64,    // 到港日差 < margin 视为冲突

    // ===== 装船效率 =====
    pub cranes_per_vessel: f64,
    pub moves_per_crane_per_hour: f64,

    // ===== 簇划分 =====
    pub small_vessel_threshold: u32,  // 低于此箱量固定 3 簇
    pub medium_vessel_threshold: u32, // 低于此箱量固定 2 簇

    // ===== 模式 =====
    pub rate_model: RateModel,
    pub static_slot_order: StaticSlotOrder,
}

impl SimulationConfig {
    /// 单船日装船能力（箱/天）
    pub fn daily_loading_capacity(&self) -> f64 {
        self.cranes_per_vessel * self.moves_per_crane_per_hour * 24.0
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            receiving_days: 7,
            simulation_tail_days: 30,
            clash_margin_days: 3,
            cranes_per_vessel: 2.7,
            moves_per_crane_per_hour: 28.0,
            small_vessel_threshold: 1000,
            medium_vessel_threshold: 1500,
            rate_model: RateModel::default(),
            static_slot_order: StaticSlotOrder::default(),
        }
    }
}
