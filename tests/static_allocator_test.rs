// ==========================================
// StaticAllocator 集成测试
// ==========================================
// 测试目标: 不考虑时间线的一次性排位
// 覆盖范围: 到港排序、槽位共享顺序、两种槽位顺序、未放入箱量
// ==========================================

mod helpers;

use container_yard_aps::config::SimulationConfig;
use container_yard_aps::domain::types::{Berth, StaticSlotOrder};
use container_yard_aps::domain::yard::{Yard, YardLayout};
use container_yard_aps::engine::{StaticAllocator, YardPlanner};
use helpers::test_data_builder::*;

fn layout() -> YardLayout {
    YardLayout::default()
        .with_block("A01", 3, 30)
        .with_block("B01", 3, 30)
        .with_block("C01", 3, 30)
}

#[test]
fn test_vessels_processed_by_arrival() {
    let mut yard = Yard::from_layout(&layout());
    let records = vec![
        VesselBuilder::new("THIRD").total(20.0).eta(sep(20)).build(),
        VesselBuilder::new("FIRST").total(45.0).eta(sep(5)).build(),
        VesselBuilder::new("SECOND").total(25.5).eta(sep(12)).build(),
    ];

    let result = StaticAllocator::new(StaticSlotOrder::Flat).allocate(&mut yard, &records);

    assert_eq!(result.slot("A01-1").unwrap().vessels, vec![("FIRST".to_string(), 30)]);
    assert_eq!(
        result.slot("A01-2").unwrap().vessels,
        vec![("FIRST".to_string(), 15), ("SECOND".to_string(), 15)]
    );
    assert_eq!(
        result.slot("A01-3").unwrap().vessels,
        vec![("SECOND".to_string(), 11), ("THIRD".to_string(), 19)]
    );
    assert_eq!(result.slot("B01-1").unwrap().vessels, vec![("THIRD".to_string(), 1)]);
    assert_eq!(result.vessel_columns(), 2);
    assert_eq!(result.total_allocated(), 45 + 26 + 20);
}

#[test]
fn test_same_arrival_keeps_input_order() {
    let mut yard = Yard::from_layout(&layout());
    let records = vec![
        VesselBuilder::new("B").total(10.0).eta(sep(5)).build(),
        VesselBuilder::new("A").total(10.0).eta(sep(5)).build(),
    ];

    let result = StaticAllocator::new(StaticSlotOrder::Flat).allocate(&mut yard, &records);

    assert_eq!(
        result.slot("A01-1").unwrap().vessels,
        vec![("B".to_string(), 10), ("A".to_string(), 10)]
    );
}

#[test]
fn test_berth_preference_slot_order() {
    let mut yard = Yard::from_layout(&layout());
    let records = vec![
        VesselBuilder::new("NP3V").total(100.0).eta(sep(5)).berth(Berth::NP3).build(),
        VesselBuilder::new("NP2V").total(10.0).eta(sep(6)).berth(Berth::NP2).build(),
    ];

    let result = StaticAllocator::new(StaticSlotOrder::BerthPreference).allocate(&mut yard, &records);

    // NP3: C01 全满 (90) → B01-1 10
    for slot_id in ["C01-1", "C01-2", "C01-3"] {
        assert_eq!(result.slot(slot_id).unwrap().used, 30);
    }
    // NP2: B01-1 剩余 20 → 放 10
    assert_eq!(
        result.slot("B01-1").unwrap().vessels,
        vec![("NP3V".to_string(), 10), ("NP2V".to_string(), 10)]
    );
    assert_eq!(result.slot("B01-1").unwrap().used, 20);
    assert!(result.slot("A01-1").unwrap().vessels.is_empty());
}

#[test]
fn test_overflow_reported_as_unallocated() {
    let mut yard = Yard::from_layout(&single_block_layout("A01", 2, 30));
    let records = vec![
        VesselBuilder::new("BIG").total(50.0).eta(sep(5)).build(),
        VesselBuilder::new("LATE").total(25.0).eta(sep(9)).build(),
    ];

    let result = StaticAllocator::new(StaticSlotOrder::Flat).allocate(&mut yard, &records);

    assert!(result.has_unallocated());
    assert_eq!(result.allocated.get("BIG"), Some(&50));
    assert_eq!(result.allocated.get("LATE"), Some(&10));
    assert_eq!(result.unallocated.get("LATE"), Some(&15));
    assert_eq!(yard.total_occupancy(), 60);
    for slot in &result.slots {
        assert!(slot.used <= slot.capacity);
    }
}

#[test]
fn test_planner_uses_configured_order() {
    let config = SimulationConfig {
        static_slot_order: StaticSlotOrder::BerthPreference,
        ..SimulationConfig::default()
    };
    let planner = YardPlanner::new(config, layout());
    let records = vec![VesselBuilder::new("V").total(5.0).berth(Berth::NP3).build()];

    let result = planner.run_static(&records);

    assert_eq!(result.slot_order, StaticSlotOrder::BerthPreference);
    assert_eq!(result.slot("C01-1").unwrap().used, 5);

    // 再次运行使用全新堆场
    let again = planner.run_static(&records);
    assert_eq!(again.slot("C01-1").unwrap().vessels, vec![("V".to_string(), 5)]);
    assert_ne!(result.run_id, again.run_id);
}
