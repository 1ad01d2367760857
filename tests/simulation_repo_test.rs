// ==========================================
// SimulationRepository 集成测试
// ==========================================
// 测试目标: 模拟结果落库与回读
// 覆盖范围: 事件顺序、快照重建、静态排位明细、配置覆盖、文件数据库
// ==========================================

mod helpers;

use container_yard_aps::config::{config_keys, ConfigManager, SimulationConfig};
use container_yard_aps::domain::types::{Berth, StaticSlotOrder};
use container_yard_aps::domain::yard::YardLayout;
use container_yard_aps::engine::YardPlanner;
use container_yard_aps::repository::SimulationRepository;
use helpers::test_data_builder::*;

fn sample_records() -> Vec<container_yard_aps::VesselRecord> {
    vec![
        VesselBuilder::new("A").total(600.0).eta(sep(10)).build(),
        VesselBuilder::new("B").total(450.0).eta(sep(11)).berth(Berth::NP2).build(),
    ]
}

#[test]
fn test_timeline_round_trip_through_database() {
    let repo = SimulationRepository::new(in_memory_conn());
    repo.ensure_schema().unwrap();

    let planner = YardPlanner::new(SimulationConfig::default(), YardLayout::default_terminal());
    let result = planner.run_timeline(&sample_records());
    repo.save_timeline(&result).unwrap();

    let events = repo.list_events(&result.run_id).unwrap();
    assert_eq!(events, result.events);

    let (peak_date, peak_total) = result.peak_day().unwrap();
    let stored = repo.load_snapshot(&result.run_id, peak_date).unwrap().unwrap();
    assert_eq!(&stored, result.snapshot(peak_date).unwrap());
    assert_eq!(stored.total_occupancy(), peak_total);

    let dates = repo.list_snapshot_dates(&result.run_id).unwrap();
    assert_eq!(dates.len(), result.day_count());
}

#[test]
fn test_static_result_persisted_in_slot_order() {
    let repo = SimulationRepository::new(in_memory_conn());
    repo.ensure_schema().unwrap();

    let layout = YardLayout::default().with_block("A01", 2, 30).with_block("B01", 2, 30);
    let planner = YardPlanner::new(SimulationConfig::default(), layout);
    let result = planner.run_static(&sample_records());
    repo.save_static(&result).unwrap();

    let rows = repo.list_static_allocation(&result.run_id).unwrap();
    let expected: Vec<(String, String, i64)> = result
        .slots
        .iter()
        .flat_map(|slot| {
            slot.vessels
                .iter()
                .map(move |(vessel, amount)| (slot.slot_id.clone(), vessel.clone(), *amount as i64))
        })
        .collect();
    let actual: Vec<(String, String, i64)> = rows
        .into_iter()
        .map(|r| (r.slot_id, r.vessel, r.amount))
        .collect();
    assert_eq!(actual, expected);

    let runs = repo.list_runs().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].mode, "static");
}

#[test]
fn test_runs_listed_and_deleted() {
    let repo = SimulationRepository::new(in_memory_conn());
    repo.ensure_schema().unwrap();

    let planner = YardPlanner::new(SimulationConfig::default(), YardLayout::default_terminal());
    let timeline = planner.run_timeline(&sample_records());
    let static_result = planner.run_static(&sample_records());
    repo.save_timeline(&timeline).unwrap();
    repo.save_static(&static_result).unwrap();

    let mut modes: Vec<_> = repo.list_runs().unwrap().into_iter().map(|r| r.mode).collect();
    modes.sort();
    assert_eq!(modes, vec!["static", "timeline"]);

    assert_eq!(repo.delete_run(&timeline.run_id).unwrap(), 1);
    assert!(repo.list_events(&timeline.run_id).unwrap().is_empty());
    assert!(repo.list_snapshot_dates(&timeline.run_id).unwrap().is_empty());
    assert_eq!(repo.list_runs().unwrap().len(), 1);
}

#[test]
fn test_config_overrides_drive_simulation() {
    let conn = in_memory_conn();
    let config_manager = ConfigManager::from_connection(conn.clone()).unwrap();
    config_manager
        .set_config_value(config_keys::RECEIVING_DAYS, "3")
        .unwrap();
    config_manager
        .set_config_value(config_keys::STATIC_SLOT_ORDER, "berth_preference")
        .unwrap();

    let config = config_manager.load_simulation_config().unwrap();
    assert_eq!(config.receiving_days, 3);
    assert_eq!(config.static_slot_order, StaticSlotOrder::BerthPreference);

    let planner = YardPlanner::new(config, config_manager.load_yard_layout().unwrap());
    let result = planner.run_timeline(&sample_records());
    // 最早到港 9/10，收箱 3 天 → 9/7 开始
    assert_eq!(result.start_date, Some(sep(7)));

    let repo = SimulationRepository::new(conn);
    repo.ensure_schema().unwrap();
    repo.save_timeline(&result).unwrap();
    assert_eq!(repo.list_runs().unwrap()[0].run_id, result.run_id);
}

#[test]
fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("yard.db");
    let db_path = db_path.to_str().unwrap();

    let planner = YardPlanner::new(SimulationConfig::default(), YardLayout::default_terminal());
    let result = planner.run_timeline(&sample_records());

    {
        let conn = container_yard_aps::db::open_sqlite_connection(db_path).unwrap();
        let repo = SimulationRepository::new(std::sync::Arc::new(std::sync::Mutex::new(conn)));
        repo.ensure_schema().unwrap();
        repo.save_timeline(&result).unwrap();
    }

    let conn = container_yard_aps::db::open_sqlite_connection(db_path).unwrap();
    let repo = SimulationRepository::new(std::sync::Arc::new(std::sync::Mutex::new(conn)));
    assert_eq!(repo.list_events(&result.run_id).unwrap().len(), result.events.len());
}
