// ==========================================
// 集装箱堆场排位系统 - 堆场拓扑领域模型
// ==========================================
// 职责: 箱区/槽位定义 + 槽位占用（arena）
// 红线: 任一槽位占用合计 <= capacity
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

// ==========================================
// BlockSpec - 箱区配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub name: String,      // 箱区名称 (如 A01)
    pub slot_count: u32,   // 槽位数
    pub capacity: u32,     // 单槽位容量 (箱)
}

impl BlockSpec {
    pub fn new(name: impl Into<String>, slot_count: u32, capacity: u32) -> Self {
        Self {
            name: name.into(),
            slot_count,
            capacity,
        }
    }
}

// ==========================================
// YardLayout - 堆场拓扑配置
// ==========================================
// 箱区按插入顺序排列
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YardLayout {
    pub blocks: Vec<BlockSpec>,
}

impl YardLayout {
    pub fn new(blocks: Vec<BlockSpec>) -> Self {
        Self { blocks }
    }

    /// 默认码头堆场
    ///
    /// - A01..A05, B01..B04: 37 槽位 × 30 箱
    /// - C01..C03: 45 槽位 × 30 箱
    pub fn default_terminal() -> Self {
        let mut blocks = Vec::new();
        for i in 1..=5 {
            blocks.push(BlockSpec::new(format!("A{:02}", i), 37, 30));
        }
        for i in 1..=4 {
            blocks.push(BlockSpec::new(format!("B{:02}", i), 37, 30));
        }
        for i in 1..=3 {
            blocks.push(BlockSpec::new(format!("C{:02}", i), 45, 30));
        }
        Self { blocks }
    }

    /// 追加箱区（链式构造）
    pub fn with_block(mut self, name: impl Into<String>, slot_count: u32, capacity: u32) -> Self {
        self.blocks.push(BlockSpec::new(name, slot_count, capacity));
        self
    }

    /// 堆场总容量
    pub fn total_capacity(&self) -> u64 {
        self.blocks
            .iter()
            .map(|b| b.slot_count as u64 * b.capacity as u64)
            .sum()
    }
}

// ==========================================
// Slot - 槽位
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub block: String,
    pub slot_no: u32,                      // 箱区内序号，从 1 开始
    pub capacity: u32,
    pub occupancy: BTreeMap<String, u32>,  // 簇标签 → 箱量
}

impl Slot {
    /// 槽位标识 `{block}-{slot_no}`
    pub fn slot_id(&self) -> String {
        format!("{}-{}", self.block, self.slot_no)
    }

    pub fn used(&self) -> u32 {
        self.occupancy.values().sum()
    }

    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.used())
    }

    pub fn quantity_of(&self, label: &str) -> u32 {
        self.occupancy.get(label).copied().unwrap_or(0)
    }
}

/// 箱区在 arena 中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntry {
    pub name: String,
    pub slots: Range<usize>,
}

// ==========================================
// Yard - 槽位 arena
// ==========================================
// 全局槽位顺序: 箱区按配置顺序, 箱区内槽位 1..N
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Yard {
    slots: Vec<Slot>,
    blocks: Vec<BlockEntry>,
}

impl Yard {
    /// 根据拓扑配置构建空堆场
    pub fn from_layout(layout: &YardLayout) -> Self {
        let mut slots = Vec::new();
        let mut blocks = Vec::with_capacity(layout.blocks.len());

        for spec in &layout.blocks {
            let start = slots.len();
            for slot_no in 1..=spec.slot_count {
                slots.push(Slot {
                    block: spec.name.clone(),
                    slot_no,
                    capacity: spec.capacity,
                    occupancy: BTreeMap::new(),
                });
            }
            blocks.push(BlockEntry {
                name: spec.name.clone(),
                slots: start..slots.len(),
            });
        }

        Self { slots, blocks }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn blocks(&self) -> &[BlockEntry] {
        &self.blocks
    }

    /// 名称以指定前缀开头的箱区（按名称升序）
    pub fn blocks_with_prefix(&self, prefix: &str) -> Vec<&BlockEntry> {
        let mut matched: Vec<&BlockEntry> = self
            .blocks
            .iter()
            .filter(|b| b.name.starts_with(prefix))
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        matched
    }

    pub fn total_capacity(&self) -> u64 {
        self.slots.iter().map(|s| s.capacity as u64).sum()
    }

    pub fn total_occupancy(&self) -> u64 {
        self.slots.iter().map(|s| s.used() as u64).sum()
    }

    /// 指定簇在全堆场的箱量
    pub fn cluster_total(&self, label: &str) -> u64 {
        self.slots.iter().map(|s| s.quantity_of(label) as u64).sum()
    }

    /// 清空所有占用
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.occupancy.clear();
        }
    }
}
