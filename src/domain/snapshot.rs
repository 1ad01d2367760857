// ==========================================
// 集装箱堆场排位系统 - 日终快照
// ==========================================
// 职责: 记录每日结束时各槽位占用（值拷贝，生成后不可变）
// ==========================================

use crate::domain::yard::Yard;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SlotSnapshot - 槽位快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub slot_id: String,
    pub block: String,
    pub capacity: u32,
    pub total: u32,
    pub clusters: BTreeMap<String, u32>,
}

// ==========================================
// DaySnapshot - 日终快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub slots: Vec<SlotSnapshot>,
}

impl DaySnapshot {
    /// 从当前堆场拷贝
    pub fn capture(date: NaiveDate, yard: &Yard) -> Self {
        let slots = yard
            .slots()
            .iter()
            .map(|slot| SlotSnapshot {
                slot_id: slot.slot_id(),
                block: slot.block.clone(),
                capacity: slot.capacity,
                total: slot.used(),
                clusters: slot.occupancy.clone(),
            })
            .collect();

        Self { date, slots }
    }

    pub fn total_occupancy(&self) -> u64 {
        self.slots.iter().map(|s| s.total as u64).sum()
    }

    pub fn total_capacity(&self) -> u64 {
        self.slots.iter().map(|s| s.capacity as u64).sum()
    }

    /// 占用率（0.0 - 1.0）
    pub fn utilization(&self) -> f64 {
        let capacity = self.total_capacity();
        if capacity == 0 {
            return 0.0;
        }
        self.total_occupancy() as f64 / capacity as f64
    }

    /// 各箱区占用合计
    pub fn block_totals(&self) -> BTreeMap<String, u64> {
        let mut totals: BTreeMap<String, u64> = BTreeMap::new();
        for slot in &self.slots {
            *totals.entry(slot.block.clone()).or_insert(0) += slot.total as u64;
        }
        totals
    }

    pub fn slot(&self, slot_id: &str) -> Option<&SlotSnapshot> {
        self.slots.iter().find(|s| s.slot_id == slot_id)
    }

    /// 指定簇在快照中的箱量
    pub fn cluster_total(&self, label: &str) -> u64 {
        self.slots
            .iter()
            .map(|s| s.clusters.get(label).copied().unwrap_or(0) as u64)
            .sum()
    }
}
