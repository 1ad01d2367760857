// ==========================================
// 集装箱堆场排位系统 - 槽位分配引擎
// ==========================================
// 职责: 按簇放入/取出箱量
// 放入: 泊位前缀偏好 → 箱区名升序 → 槽位序号升序，跳过冲突箱区
// 取出: 全局槽位顺序平扫，无偏好
// 红线: 任一槽位不得超过 capacity；不得放入冲突箱区
// ==========================================

use crate::domain::types::Berth;
use crate::domain::vessel::VesselState;
use crate::domain::yard::Yard;
use crate::engine::clash::ClashTracker;
use chrono::NaiveDate;

/// 分配所需的船舶信息
#[derive(Debug, Clone, Copy)]
pub struct VesselRef<'a> {
    pub name: &'a str,
    pub arrival: NaiveDate,
    pub berth: &'a Berth,
}

impl<'a> From<&'a VesselState> for VesselRef<'a> {
    fn from(state: &'a VesselState) -> Self {
        Self {
            name: &state.name,
            arrival: state.arrival,
            berth: &state.berth,
        }
    }
}

/// 单槽位落位记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub slot_index: usize,
    pub slot_id: String,
    pub quantity: u32,
}

/// 放入结果
///
/// `leftover > 0` 表示在当前冲突/偏好约束下堆场已无空间，属正常结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub requested: u32,
    pub placed: u32,
    pub leftover: u32,
    pub placements: Vec<Placement>,
    pub skipped_blocks: Vec<String>,
    pub blocks_used: Vec<String>,
}

impl AllocationOutcome {
    pub fn is_complete(&self) -> bool {
        self.leftover == 0
    }
}

/// 取出结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeallocationOutcome {
    pub requested: u32,
    pub removed: u32,
    pub leftover: u32,
}

// ==========================================
// SlotAllocator - 槽位分配引擎
// ==========================================
pub struct SlotAllocator {
    // 无状态引擎，状态均在 Yard / ClashTracker 中
}

impl SlotAllocator {
    pub fn new() -> Self {
        Self {}
    }

    /// 放入簇箱量
    ///
    /// # 参数
    /// - `yard`: 堆场（会被修改）
    /// - `clash`: 冲突跟踪器（首次在某箱区放入时追加记录）
    /// - `cluster_label`: 簇标签
    /// - `qty`: 待放入箱量
    /// - `vessel`: 所属船舶
    pub fn allocate(
        &self,
        yard: &mut Yard,
        clash: &mut ClashTracker,
        cluster_label: &str,
        qty: u32,
        vessel: VesselRef<'_>,
    ) -> AllocationOutcome {
        let mut outcome = AllocationOutcome {
            requested: qty,
            ..Default::default()
        };
        let mut remaining = qty;

        for prefix in vessel.berth.block_preference() {
            if remaining == 0 {
                break;
            }

            let candidates: Vec<(String, std::ops::Range<usize>)> = yard
                .blocks_with_prefix(prefix)
                .into_iter()
                .map(|b| (b.name.clone(), b.slots.clone()))
                .collect();

            for (block_name, slot_range) in candidates {
                if remaining == 0 {
                    break;
                }

                // 冲突箱区整体跳过
                if clash.is_clashing(vessel.name, vessel.arrival, &block_name) {
                    tracing::debug!(
                        vessel = vessel.name,
                        cluster = cluster_label,
                        block = %block_name,
                        "到港冲突，跳过箱区"
                    );
                    outcome.skipped_blocks.push(block_name);
                    continue;
                }

                let mut placed_in_block = 0u32;
                for slot_index in slot_range {
                    if remaining == 0 {
                        break;
                    }
                    let slot = &mut yard.slots_mut()[slot_index];
                    let free = slot.free();
                    if free == 0 {
                        continue;
                    }

                    let put = free.min(remaining);
                    *slot.occupancy.entry(cluster_label.to_string()).or_insert(0) += put;
                    remaining -= put;
                    placed_in_block += put;

                    outcome.placements.push(Placement {
                        slot_index,
                        slot_id: slot.slot_id(),
                        quantity: put,
                    });
                }

                if placed_in_block > 0 {
                    clash.record_usage(vessel.name, vessel.arrival, &block_name);
                    outcome.blocks_used.push(block_name);
                }
            }
        }

        outcome.placed = qty - remaining;
        outcome.leftover = remaining;

        if remaining > 0 {
            tracing::warn!(
                vessel = vessel.name,
                cluster = cluster_label,
                requested = qty,
                leftover = remaining,
                "堆场容量不足，部分箱量未能放入"
            );
        }

        outcome
    }

    /// 取出簇箱量（全局槽位顺序平扫）
    pub fn deallocate(&self, yard: &mut Yard, cluster_label: &str, qty: u32) -> DeallocationOutcome {
        let mut remaining = qty;

        for slot in yard.slots_mut() {
            if remaining == 0 {
                break;
            }
            let Some(available) = slot.occupancy.get_mut(cluster_label) else {
                continue;
            };

            let take = (*available).min(remaining);
            *available -= take;
            remaining -= take;

            if *available == 0 {
                slot.occupancy.remove(cluster_label);
            }
        }

        DeallocationOutcome {
            requested: qty,
            removed: qty - remaining,
            leftover: remaining,
        }
    }
}

impl Default for SlotAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::yard::YardLayout;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn vessel<'a>(name: &'a str, arrival: NaiveDate, berth: &'a Berth) -> VesselRef<'a> {
        VesselRef {
            name,
            arrival,
            berth,
        }
    }

    #[test]
    fn test_allocate_fills_lowest_slots_first() {
        let mut yard = Yard::from_layout(&YardLayout::default().with_block("A01", 2, 5));
        let mut clash = ClashTracker::new(3);
        let allocator = SlotAllocator::new();

        let outcome = allocator.allocate(&mut yard, &mut clash, "X-C1", 8, vessel("X", day(10), &Berth::NP1));

        assert_eq!(outcome.leftover, 0);
        assert_eq!(yard.slots()[0].quantity_of("X-C1"), 5);
        assert_eq!(yard.slots()[1].quantity_of("X-C1"), 3);
        assert_eq!(outcome.blocks_used, vec!["A01"]);
        assert_eq!(clash.usage_of("A01").len(), 1);
    }

    #[test]
    fn test_allocate_reports_leftover() {
        let mut yard = Yard::from_layout(&YardLayout::default().with_block("A01", 2, 5));
        let mut clash = ClashTracker::new(3);

        let outcome =
            SlotAllocator::new().allocate(&mut yard, &mut clash, "X-C1", 12, vessel("X", day(10), &Berth::NP1));

        assert_eq!(outcome.placed, 10);
        assert_eq!(outcome.leftover, 2);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_allocate_zero_is_noop() {
        let mut yard = Yard::from_layout(&YardLayout::default().with_block("A01", 2, 5));
        let mut clash = ClashTracker::new(3);
        let before = yard.clone();

        let outcome =
            SlotAllocator::new().allocate(&mut yard, &mut clash, "X-C1", 0, vessel("X", day(10), &Berth::NP1));

        assert_eq!(outcome.leftover, 0);
        assert_eq!(yard, before);
        assert!(clash.usage_of("A01").is_empty());
    }

    #[test]
    fn test_berth_preference_order() {
        let layout = YardLayout::default()
            .with_block("A01", 1, 5)
            .with_block("B01", 1, 5)
            .with_block("C01", 1, 5);
        let mut yard = Yard::from_layout(&layout);
        let mut clash = ClashTracker::new(3);

        let outcome =
            SlotAllocator::new().allocate(&mut yard, &mut clash, "Y-C1", 7, vessel("Y", day(10), &Berth::NP3));

        assert_eq!(outcome.blocks_used, vec!["C01", "B01"]);
        assert_eq!(yard.slots()[2].quantity_of("Y-C1"), 5);
        assert_eq!(yard.slots()[1].quantity_of("Y-C1"), 2);
        assert_eq!(yard.slots()[0].used(), 0);
    }

    #[test]
    fn test_deallocate_sweeps_and_removes_entry() {
        let mut yard = Yard::from_layout(&YardLayout::default().with_block("A01", 3, 5));
        let mut clash = ClashTracker::new(3);
        let allocator = SlotAllocator::new();
        allocator.allocate(&mut yard, &mut clash, "X-C1", 12, vessel("X", day(10), &Berth::NP1));

        let outcome = allocator.deallocate(&mut yard, "X-C1", 7);
        assert_eq!(outcome.removed, 7);
        assert_eq!(outcome.leftover, 0);
        assert!(!yard.slots()[0].occupancy.contains_key("X-C1"));
        assert_eq!(yard.slots()[1].quantity_of("X-C1"), 3);

        let outcome = allocator.deallocate(&mut yard, "X-C1", 10);
        assert_eq!(outcome.removed, 5);
        assert_eq!(outcome.leftover, 5);
        assert_eq!(yard.total_occupancy(), 0);
    }
}
