// ==========================================
// 集装箱堆场排位系统 - 船期构建器
// ==========================================
// 职责: 船舶输入记录 → 模拟状态（簇划分 + 收箱/装船窗口）
// 输入: VesselRecord 列表（已校验）
// 输出: VesselState 列表，done = false（退化船舶除外）
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::vessel::{Cluster, VesselRecord, VesselState};
use chrono::{Duration, NaiveDate};

// ==========================================
// VesselScheduleBuilder - 船期构建器
// ==========================================
#[derive(Debug, Clone)]
pub struct VesselScheduleBuilder {
    receiving_days: i64,
    small_vessel_threshold: u32,
    medium_vessel_threshold: u32,
    daily_loading_capacity: f64,
}

impl VesselScheduleBuilder {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            receiving_days: config.receiving_days,
            small_vessel_threshold: config.small_vessel_threshold,
            medium_vessel_threshold: config.medium_vessel_threshold,
            daily_loading_capacity: config.daily_loading_capacity(),
        }
    }

    /// 批量构建（保持输入顺序）
    pub fn build(&self, records: &[VesselRecord]) -> Vec<VesselState> {
        records.iter().map(|r| self.build_one(r)).collect()
    }

    /// 构建单船状态
    pub fn build_one(&self, record: &VesselRecord) -> VesselState {
        let total = round_up_total(record.total_containers);
        let cluster_count = self.effective_cluster_count(total, record.cluster_need);
        let clusters = partition_clusters(&record.vessel, total, cluster_count);
        let load_days = self.loading_days(total);

        let arrival = record.eta;
        let start_receive = arrival - Duration::days(self.receiving_days);
        let end_receive = arrival - Duration::days(1);
        let start_load = arrival;
        let end_load = loading_window_end(arrival, load_days);

        let degenerate = total == 0 || clusters.is_empty();
        if degenerate {
            tracing::warn!(
                vessel = %record.vessel,
                total_containers = record.total_containers,
                cluster_need = record.cluster_need,
                "退化船舶（箱量或簇数为 0），直接标记完成"
            );
        } else {
            tracing::debug!(
                vessel = %record.vessel,
                total,
                clusters = clusters.len(),
                load_days,
                %start_receive,
                %end_load,
                "船期构建完成"
            );
        }

        VesselState {
            name: record.vessel.clone(),
            total,
            arrival,
            berth: record.berth.clone(),
            cluster_hint: record.cluster_need,
            clusters,
            start_receive,
            end_receive,
            start_load,
            end_load,
            load_days,
            done: degenerate,
        }
    }

    /// 有效簇数
    ///
    /// - total < 1000 → 3
    /// - total < 1500 → 2
    /// - 否则使用提示值
    pub fn effective_cluster_count(&self, total: u32, hint: i64) -> i64 {
        if total < self.small_vessel_threshold {
            3
        } else if total < self.medium_vessel_threshold {
            2
        } else {
            hint
        }
    }

    /// 装船天数: ceil(total / 日装船能力)，total > 0 时至少 1 天
    pub fn loading_days(&self, total: u32) -> u32 {
        if total == 0 {
            return 0;
        }
        if !(self.daily_loading_capacity.is_finite() && self.daily_loading_capacity > 0.0) {
            return 1;
        }
        let days = (total as f64 / self.daily_loading_capacity).ceil();
        (days as u32).max(1)
    }
}

/// 箱量向上取整；非正数/非法值视为 0
pub fn round_up_total(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let rounded = raw.ceil();
    if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// 均分簇：余数分配给前面的簇
pub fn partition_clusters(vessel: &str, total: u32, cluster_count: i64) -> Vec<Cluster> {
    if cluster_count <= 0 {
        return Vec::new();
    }
    let count = cluster_count as u64;
    let base = total as u64 / count;
    let remainder = total as u64 % count;

    (0..count)
        .map(|i| {
            let size = base + u64::from(i < remainder);
            Cluster::new(vessel, i as usize + 1, size as u32)
        })
        .collect()
}

/// 装船窗口结束日: arrival + load_days - 1（0 天时早于 arrival）
fn loading_window_end(arrival: NaiveDate, load_days: u32) -> NaiveDate {
    arrival + Duration::days(load_days as i64 - 1)
}
