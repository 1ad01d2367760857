// ==========================================
// 集装箱堆场排位系统 - 时间线模拟引擎
// ==========================================
// 职责: 逐日驱动收箱/装船，生成事件日志与日终快照
// 输入: 船舶状态列表 + 空堆场
// 输出: TimelineResult（事件、快照、最终船舶状态）
// ==========================================
// 单日流程（每船，阶段 PENDING → RECEIVING → LOADING → DONE）:
// 1) day > end_load 且未完成 → 标记完成（不记事件）
// 2) 收箱（RECEIVING）: 窗口内按日比例放入；到港日补收全部剩余
// 3) 装船: 窗口内按簇 size 比例取出（不受实际收入量限制）
// 4) end_load == day 且未完成 → 标记完成并记事件
// 全部船舶处理后拍摄日终快照
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::event::{EventLog, YardEvent};
use crate::domain::snapshot::DaySnapshot;
use crate::domain::types::{EventKind, VesselPhase};
use crate::domain::vessel::VesselState;
use crate::domain::yard::Yard;
use crate::engine::allocator::{AllocationOutcome, SlotAllocator, VesselRef};
use crate::engine::clash::ClashTracker;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

// ==========================================
// TimelineResult - 模拟结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResult {
    pub run_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub events: Vec<YardEvent>,                       // 按 (日期, 描述) 排序
    pub snapshots: BTreeMap<NaiveDate, DaySnapshot>,  // 每日一份
    pub vessels: Vec<VesselState>,                    // 模拟结束时状态
}

impl TimelineResult {
    pub fn day_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn snapshot(&self, date: NaiveDate) -> Option<&DaySnapshot> {
        self.snapshots.get(&date)
    }

    /// 占用最高的日期（并列取最早）
    pub fn peak_day(&self) -> Option<(NaiveDate, u64)> {
        let mut peak: Option<(NaiveDate, u64)> = None;
        for (date, snapshot) in &self.snapshots {
            let occupied = snapshot.total_occupancy();
            match peak {
                Some((_, best)) if occupied <= best => {}
                _ => peak = Some((*date, occupied)),
            }
        }
        peak
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&YardEvent> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    pub fn events_for(&self, vessel: &str) -> Vec<&YardEvent> {
        self.events.iter().filter(|e| e.vessel == vessel).collect()
    }

    /// 收箱总量（RECV + RECV-FINAL）
    pub fn received_total(&self, vessel: &str) -> u64 {
        self.sum_quantity(vessel, |k| matches!(k, EventKind::Receive | EventKind::ReceiveFinal))
    }

    /// 装船总量
    pub fn loaded_total(&self, vessel: &str) -> u64 {
        self.sum_quantity(vessel, |k| k == EventKind::Load)
    }

    /// 所有船舶未能放入的箱量（按事件累计）
    pub fn shortfall_total(&self) -> u64 {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Shortfall)
            .map(|e| e.quantity as u64)
            .sum()
    }

    pub fn vessel(&self, name: &str) -> Option<&VesselState> {
        self.vessels.iter().find(|v| v.name == name)
    }

    fn sum_quantity(&self, vessel: &str, pred: impl Fn(EventKind) -> bool) -> u64 {
        self.events
            .iter()
            .filter(|e| e.vessel == vessel && pred(e.kind))
            .map(|e| e.quantity as u64)
            .sum()
    }
}

// ==========================================
// TimelineSimulator - 时间线模拟引擎
// ==========================================
pub struct TimelineSimulator {
    config: SimulationConfig,
    allocator: SlotAllocator,
}

impl TimelineSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            allocator: SlotAllocator::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// 模拟日期范围: min(arrival) - receiving_days ..= max(arrival) + tail_days
    pub fn date_range(&self, vessels: &[VesselState]) -> Option<(NaiveDate, NaiveDate)> {
        let min_arrival = vessels.iter().map(|v| v.arrival).min()?;
        let max_arrival = vessels.iter().map(|v| v.arrival).max()?;

        let start = min_arrival - Duration::days(self.config.receiving_days);
        let end = max_arrival + Duration::days(self.config.simulation_tail_days);
        if end < start {
            return None;
        }
        Some((start, end))
    }

    /// 执行完整模拟
    ///
    /// # 参数
    /// - `yard`: 堆场（会被修改，结束时为最后一日状态）
    /// - `vessels`: 船期构建器输出
    #[instrument(skip(self, yard, vessels), fields(vessel_count = vessels.len()))]
    pub fn run(&self, yard: &mut Yard, mut vessels: Vec<VesselState>) -> TimelineResult {
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut clash = ClashTracker::new(self.config.clash_margin_days);
        let mut events = EventLog::new();
        let mut snapshots = BTreeMap::new();

        let range = self.date_range(&vessels);
        match range {
            Some((start, end)) => {
                info!(%run_id, %start, %end, "开始时间线模拟");
                let mut day = start;
                while day <= end {
                    self.step_day(day, yard, &mut clash, &mut vessels, &mut events);
                    snapshots.insert(day, DaySnapshot::capture(day, yard));
                    day += Duration::days(1);
                }
            }
            None => info!(%run_id, "无可模拟日期，跳过时间线模拟"),
        }

        info!(
            %run_id,
            days = snapshots.len(),
            events = events.len(),
            "时间线模拟完成"
        );

        TimelineResult {
            run_id,
            start_date: range.map(|(s, _)| s),
            end_date: range.map(|(_, e)| e),
            events: events.into_sorted(),
            snapshots,
            vessels,
        }
    }

    /// 处理单日全部船舶（不拍快照）
    pub fn step_day(
        &self,
        day: NaiveDate,
        yard: &mut Yard,
        clash: &mut ClashTracker,
        vessels: &mut [VesselState],
        events: &mut EventLog,
    ) {
        for vessel in vessels.iter_mut() {
            let phase = vessel.phase_on(day);

            // 兜底完成判定（不记事件）
            if phase == VesselPhase::Done {
                if !vessel.done {
                    debug!(vessel = %vessel.name, %day, "装船窗口已过，标记完成");
                    vessel.done = true;
                }
                continue;
            }

            if phase == VesselPhase::Receiving {
                self.receive(day, vessel, yard, clash, events);
            }
            // 到港日处于 Receiving，但装船窗口同日开始
            self.load(day, vessel, yard, events);

            if vessel.end_load == day {
                vessel.done = true;
                events.push(YardEvent::complete(day, &vessel.name));
                info!(vessel = %vessel.name, %day, "船舶装船完成");
            }
        }
    }

    // ==========================================
    // 收箱
    // ==========================================

    fn receive(
        &self,
        day: NaiveDate,
        vessel: &mut VesselState,
        yard: &mut Yard,
        clash: &mut ClashTracker,
        events: &mut EventLog,
    ) {
        if vessel.is_degenerate() {
            return;
        }

        if vessel.in_receiving_window(day) {
            let day_number = vessel.receiving_day_number(day);
            let rate = self.config.rate_model.rate_for(&vessel.name, day_number);
            let daily_in = (vessel.total as f64 * rate).ceil() as u64;
            let total = vessel.total as u64;

            let vessel_ref = VesselRef {
                name: &vessel.name,
                arrival: vessel.arrival,
                berth: &vessel.berth,
            };
            for cluster in vessel.clusters.iter_mut().filter(|c| c.remain > 0) {
                let share = ceil_div(daily_in.saturating_mul(cluster.size as u64), total);
                let portion = share.min(cluster.remain as u64) as u32;

                let outcome = self.allocator.allocate(yard, clash, &cluster.label, portion, vessel_ref);
                cluster.remain -= outcome.placed;

                if outcome.placed > 0 {
                    events.push(YardEvent::receive(day, vessel_ref.name, &cluster.label, outcome.placed));
                }
                record_side_events(day, vessel_ref.name, &cluster.label, &outcome, events);
            }
        } else if day == vessel.arrival {
            // 到港日补收全部剩余
            let vessel_ref = VesselRef {
                name: &vessel.name,
                arrival: vessel.arrival,
                berth: &vessel.berth,
            };
            for cluster in vessel.clusters.iter_mut().filter(|c| c.remain > 0) {
                let outcome = self.allocator.allocate(yard, clash, &cluster.label, cluster.remain, vessel_ref);
                cluster.remain -= outcome.placed;

                if outcome.placed > 0 {
                    events.push(YardEvent::receive_final(
                        day,
                        vessel_ref.name,
                        &cluster.label,
                        outcome.placed,
                    ));
                }
                record_side_events(day, vessel_ref.name, &cluster.label, &outcome, events);
            }
        }
    }

    // ==========================================
    // 装船
    // ==========================================

    fn load(&self, day: NaiveDate, vessel: &mut VesselState, yard: &mut Yard, events: &mut EventLog) {
        if vessel.is_degenerate() || vessel.load_days == 0 || !vessel.in_loading_window(day) {
            return;
        }

        let total = vessel.total as u64;
        let daily_out = ceil_div(total, vessel.load_days as u64);

        for cluster in &vessel.clusters {
            let portion_out = ceil_div(daily_out * cluster.size as u64, total);
            let portion_out = portion_out.min(u32::MAX as u64) as u32;

            let outcome = self.allocator.deallocate(yard, &cluster.label, portion_out);
            if outcome.removed > 0 {
                events.push(YardEvent::load(day, &vessel.name, &cluster.label, outcome.removed));
            }
        }
    }
}

/// 冲突跳过与容量不足事件
fn record_side_events(
    day: NaiveDate,
    vessel: &str,
    cluster: &str,
    outcome: &AllocationOutcome,
    events: &mut EventLog,
) {
    for block in &outcome.skipped_blocks {
        events.push(YardEvent::clash_skip(day, vessel, cluster, block));
    }
    if outcome.leftover > 0 {
        events.push(YardEvent::shortfall(day, vessel, cluster, outcome.leftover));
    }
}

/// 向上取整除法（除数为 0 时返回 0）
pub(crate) fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    numerator.div_ceil(denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateModel;
    use crate::domain::types::Berth;
    use crate::domain::vessel::VesselRecord;
    use crate::domain::yard::YardLayout;
    use crate::engine::schedule_builder::VesselScheduleBuilder;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn build(config: &SimulationConfig, records: &[VesselRecord]) -> Vec<VesselState> {
        VesselScheduleBuilder::new(config).build(records)
    }

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(10, 3), 4);
        assert_eq!(ceil_div(9, 3), 3);
        assert_eq!(ceil_div(0, 3), 0);
        assert_eq!(ceil_div(5, 0), 0);
    }

    #[test]
    fn test_date_range() {
        let config = SimulationConfig::default();
        let vessels = build(
            &config,
            &[
                VesselRecord::new("X", 500.0, 1, day(7, 10), Berth::NP1),
                VesselRecord::new("Y", 500.0, 1, day(7, 20), Berth::NP2),
            ],
        );
        let sim = TimelineSimulator::new(config);
        assert_eq!(sim.date_range(&vessels), Some((day(7, 3), day(8, 19))));
        assert_eq!(sim.date_range(&[]), None);
    }

    #[test]
    fn test_single_vessel_flow() {
        let config = SimulationConfig::default();
        let vessels = build(&config, &[VesselRecord::new("X", 1000.0, 1, day(7, 10), Berth::NP1)]);
        let mut yard = Yard::from_layout(&YardLayout::default().with_block("A01", 40, 30));

        let result = TimelineSimulator::new(config).run(&mut yard, vessels);

        assert_eq!(result.received_total("X"), 1000);
        assert_eq!(result.loaded_total("X"), 1000);

        // 收箱窗口第一天: 120 箱, 两簇各 60
        let first = result.events_on(day(7, 3));
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|e| e.kind == EventKind::Receive && e.quantity == 60));

        // 到港日: 补收 + 装船 + 完成
        let arrival_events = result.events_on(day(7, 10));
        assert!(arrival_events.iter().any(|e| e.kind == EventKind::ReceiveFinal));
        assert!(arrival_events.iter().any(|e| e.kind == EventKind::Complete));

        // 到港前一日堆场满载 840，装船日结束清空
        assert_eq!(result.snapshot(day(7, 9)).unwrap().total_occupancy(), 840);
        assert_eq!(result.snapshot(day(7, 10)).unwrap().total_occupancy(), 0);
        assert_eq!(result.peak_day(), Some((day(7, 9), 840)));
        assert!(result.vessels[0].done);
    }

    #[test]
    fn test_completion_logged_once() {
        let config = SimulationConfig::default();
        let vessels = build(&config, &[VesselRecord::new("X", 4000.0, 2, day(7, 10), Berth::NP1)]);
        let mut yard = Yard::from_layout(&YardLayout::default_terminal());

        let result = TimelineSimulator::new(config).run(&mut yard, vessels);

        let completes: Vec<_> = result
            .events
            .iter()
            .filter(|e| e.kind == EventKind::Complete)
            .collect();
        assert_eq!(completes.len(), 1);
        // 4000 / 1814.4 → 3 天: 7/10 .. 7/12
        assert_eq!(completes[0].date, day(7, 12));
    }

    #[test]
    fn test_empty_receiving_window_guarded() {
        let mut config = SimulationConfig::default();
        config.receiving_days = 0;
        let vessels = build(&config, &[VesselRecord::new("X", 600.0, 1, day(7, 10), Berth::NP1)]);
        let mut yard = Yard::from_layout(&YardLayout::default().with_block("A01", 40, 30));

        let result = TimelineSimulator::new(config).run(&mut yard, vessels);

        // 无日常收箱，全部在到港日补收
        assert!(result.events.iter().all(|e| e.kind != EventKind::Receive));
        assert_eq!(result.received_total("X"), 600);
        assert_eq!(result.start_date, Some(day(7, 10)));
    }

    #[test]
    fn test_elapsed_window_marks_done_silently() {
        let config = SimulationConfig::default();
        let mut vessels = build(&config, &[VesselRecord::new("X", 1000.0, 1, day(7, 10), Berth::NP1)]);
        assert!(!vessels[0].done);
        assert_eq!(vessels[0].end_load, day(7, 10));

        let mut yard = Yard::from_layout(&YardLayout::default().with_block("A01", 40, 30));
        let mut clash = ClashTracker::new(config.clash_margin_days);
        let mut events = EventLog::new();
        let sim = TimelineSimulator::new(config);

        sim.step_day(day(7, 11), &mut yard, &mut clash, &mut vessels, &mut events);

        assert!(vessels[0].done);
        assert_eq!(vessels[0].phase_on(day(7, 11)), VesselPhase::Done);
        assert_eq!(events.len(), 0);
        assert!(events.into_sorted().iter().all(|e| e.kind != EventKind::Complete));
        // 未收箱也未装船
        assert_eq!(vessels[0].total_remaining(), 1000);
        assert_eq!(DaySnapshot::capture(day(7, 11), &yard).total_occupancy(), 0);
    }

    #[test]
    fn test_arrival_day_receives_and_loads() {
        let config = SimulationConfig::default();
        let mut vessels = build(&config, &[VesselRecord::new("X", 1000.0, 1, day(7, 10), Berth::NP1)]);
        let mut yard = Yard::from_layout(&YardLayout::default().with_block("A01", 40, 30));
        let mut clash = ClashTracker::new(config.clash_margin_days);
        let mut events = EventLog::new();
        let sim = TimelineSimulator::new(config);

        assert_eq!(vessels[0].phase_on(day(7, 10)), VesselPhase::Receiving);
        sim.step_day(day(7, 10), &mut yard, &mut clash, &mut vessels, &mut events);

        let events = events.into_sorted();
        assert!(events.iter().any(|e| e.kind == EventKind::ReceiveFinal));
        assert!(events.iter().any(|e| e.kind == EventKind::Load));
        assert_eq!(events.iter().filter(|e| e.kind == EventKind::Complete).count(), 1);
        assert!(vessels[0].done);
    }

    #[test]
    fn test_huge_rate_does_not_overflow() {
        let mut config = SimulationConfig::default();
        config.rate_model = RateModel::Flat(1e12);
        let vessels = build(&config, &[VesselRecord::new("X", 60000.0, 2, day(7, 10), Berth::NP1)]);
        let mut yard = Yard::from_layout(&YardLayout::default_terminal());

        let result = TimelineSimulator::new(config).run(&mut yard, vessels);

        // 首个收箱日即尝试收满全船，其余为容量不足
        let first_day_in: u64 = result
            .events_on(day(7, 3))
            .iter()
            .filter(|e| e.kind == EventKind::Receive)
            .map(|e| e.quantity as u64)
            .sum();
        let first_day_short: u64 = result
            .events_on(day(7, 3))
            .iter()
            .filter(|e| e.kind == EventKind::Shortfall)
            .map(|e| e.quantity as u64)
            .sum();
        assert_eq!(first_day_in + first_day_short, 60000);
        assert_eq!(first_day_in, 14040);
    }

    #[test]
    fn test_degenerate_vessel_never_touches_yard() {
        let config = SimulationConfig::default();
        let vessels = build(&config, &[VesselRecord::new("Z", 0.0, 1, day(7, 10), Berth::NP1)]);
        let mut yard = Yard::from_layout(&YardLayout::default().with_block("A01", 4, 30));

        let result = TimelineSimulator::new(config).run(&mut yard, vessels);

        assert!(result.events.is_empty());
        assert!(result.snapshots.values().all(|s| s.total_occupancy() == 0));
        assert!(result.vessels[0].done);
    }
}
