// ==========================================
// 集装箱堆场排位系统 - 静态排位引擎
// ==========================================
// 职责: 不考虑时间线，一次性把每船全部箱量装入槽位
// 规则:
// 1) 船舶按到港日升序（同日保持输入顺序）
// 2) 槽位顺序: 全局顺序 或 泊位偏好顺序（配置决定）
// 3) 逐槽位填满空闲容量；无冲突检查、无日粒度
// 4) 超出堆场容量的箱量记入 unallocated，不视为错误
// ==========================================

use crate::domain::types::{Berth, StaticSlotOrder};
use crate::domain::vessel::VesselRecord;
use crate::domain::yard::Yard;
use crate::engine::schedule_builder::round_up_total;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

// ==========================================
// StaticSlotEntry - 槽位静态排位
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticSlotEntry {
    pub slot_id: String,
    pub block: String,
    pub capacity: u32,
    pub used: u32,
    pub vessels: Vec<(String, u32)>, // 按放入顺序（Vessel 1, Vessel 2, …）
}

// ==========================================
// StaticAllocationResult - 静态排位结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAllocationResult {
    pub run_id: String,
    pub slot_order: StaticSlotOrder,
    pub slots: Vec<StaticSlotEntry>,          // 全局槽位顺序
    pub allocated: BTreeMap<String, u32>,     // 船名 → 已放入
    pub unallocated: BTreeMap<String, u32>,   // 船名 → 未放入 (> 0)
}

impl StaticAllocationResult {
    /// 单槽位最多承载的船舶数（表格列数）
    pub fn vessel_columns(&self) -> usize {
        self.slots.iter().map(|s| s.vessels.len()).max().unwrap_or(0)
    }

    pub fn slot(&self, slot_id: &str) -> Option<&StaticSlotEntry> {
        self.slots.iter().find(|s| s.slot_id == slot_id)
    }

    pub fn total_allocated(&self) -> u64 {
        self.allocated.values().map(|v| *v as u64).sum()
    }

    pub fn has_unallocated(&self) -> bool {
        !self.unallocated.is_empty()
    }
}

// ==========================================
// StaticAllocator - 静态排位引擎
// ==========================================
pub struct StaticAllocator {
    slot_order: StaticSlotOrder,
}

impl StaticAllocator {
    pub fn new(slot_order: StaticSlotOrder) -> Self {
        Self { slot_order }
    }

    /// 一次性排位
    ///
    /// # 参数
    /// - `yard`: 堆场（会被修改，占用按船名记录）
    /// - `records`: 船舶输入记录
    #[instrument(skip(self, yard, records), fields(slot_order = self.slot_order.as_str(), vessel_count = records.len()))]
    pub fn allocate(&self, yard: &mut Yard, records: &[VesselRecord]) -> StaticAllocationResult {
        let mut entries: Vec<StaticSlotEntry> = yard
            .slots()
            .iter()
            .map(|slot| StaticSlotEntry {
                slot_id: slot.slot_id(),
                block: slot.block.clone(),
                capacity: slot.capacity,
                used: slot.used(),
                vessels: Vec::new(),
            })
            .collect();

        let mut ordered: Vec<&VesselRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.eta);

        let mut allocated = BTreeMap::new();
        let mut unallocated = BTreeMap::new();

        for record in ordered {
            let total = round_up_total(record.total_containers);
            let mut remaining = total;

            for slot_index in self.slot_sequence(yard, &record.berth) {
                if remaining == 0 {
                    break;
                }
                let slot = &mut yard.slots_mut()[slot_index];
                let free = slot.free();
                if free == 0 {
                    continue;
                }

                let put = free.min(remaining);
                *slot.occupancy.entry(record.vessel.clone()).or_insert(0) += put;
                remaining -= put;

                let entry = &mut entries[slot_index];
                entry.used += put;
                entry.vessels.push((record.vessel.clone(), put));
            }

            *allocated.entry(record.vessel.clone()).or_insert(0) += total - remaining;
            if remaining > 0 {
                warn!(vessel = %record.vessel, remaining, "堆场容量不足，静态排位未完全放入");
                *unallocated.entry(record.vessel.clone()).or_insert(0) += remaining;
            }
        }

        info!(
            allocated = allocated.values().map(|v: &u32| *v as u64).sum::<u64>(),
            unallocated_vessels = unallocated.len(),
            "静态排位完成"
        );

        StaticAllocationResult {
            run_id: uuid::Uuid::new_v4().to_string(),
            slot_order: self.slot_order,
            slots: entries,
            allocated,
            unallocated,
        }
    }

    /// 槽位遍历顺序
    ///
    /// 泊位偏好模式下，不匹配任何偏好前缀的箱区按全局顺序排在最后
    pub fn slot_sequence(&self, yard: &Yard, berth: &Berth) -> Vec<usize> {
        match self.slot_order {
            StaticSlotOrder::Flat => (0..yard.slots().len()).collect(),
            StaticSlotOrder::BerthPreference => {
                let preference = berth.block_preference();
                let mut sequence = Vec::with_capacity(yard.slots().len());

                for prefix in preference {
                    for block in yard.blocks_with_prefix(prefix) {
                        sequence.extend(block.slots.clone());
                    }
                }
                for block in yard.blocks() {
                    if !preference.iter().any(|p| block.name.starts_with(p)) {
                        sequence.extend(block.slots.clone());
                    }
                }
                sequence
            }
        }
    }
}
