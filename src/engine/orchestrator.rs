// ==========================================
// 集装箱堆场排位系统 - 引擎编排器
// ==========================================
// 用途: 协调船期构建 → 时间线模拟 / 静态排位
// 说明: 每次运行使用全新堆场，两种模式互不影响
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::vessel::VesselRecord;
use crate::domain::yard::{Yard, YardLayout};
use crate::engine::schedule_builder::VesselScheduleBuilder;
use crate::engine::static_allocator::{StaticAllocationResult, StaticAllocator};
use crate::engine::timeline::{TimelineResult, TimelineSimulator};
use tracing::info;

// ==========================================
// YardPlanner - 堆场排位编排器
// ==========================================
pub struct YardPlanner {
    config: SimulationConfig,
    layout: YardLayout,
}

impl YardPlanner {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 模拟参数
    /// - layout: 堆场拓扑
    pub fn new(config: SimulationConfig, layout: YardLayout) -> Self {
        Self { config, layout }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn layout(&self) -> &YardLayout {
        &self.layout
    }

    /// 时间线模拟
    pub fn run_timeline(&self, records: &[VesselRecord]) -> TimelineResult {
        info!(
            vessel_count = records.len(),
            block_count = self.layout.blocks.len(),
            "执行时间线模拟"
        );

        let vessels = VesselScheduleBuilder::new(&self.config).build(records);
        let mut yard = Yard::from_layout(&self.layout);
        TimelineSimulator::new(self.config.clone()).run(&mut yard, vessels)
    }

    /// 静态排位（槽位顺序取自配置）
    pub fn run_static(&self, records: &[VesselRecord]) -> StaticAllocationResult {
        info!(
            vessel_count = records.len(),
            slot_order = self.config.static_slot_order.as_str(),
            "执行静态排位"
        );

        let mut yard = Yard::from_layout(&self.layout);
        StaticAllocator::new(self.config.static_slot_order).allocate(&mut yard, records)
    }
}
