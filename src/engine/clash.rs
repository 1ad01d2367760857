// ==========================================
// 集装箱堆场排位系统 - 到港冲突跟踪
// ==========================================
// 职责: 记录船舶使用过的箱区，判断到港日相近的船舶是否冲突
// 规则: |到港日差| < margin_days 视为冲突（按箱区粒度）
// 说明: 使用记录只追加不删除，船舶完成后仍保留
// ==========================================

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// 箱区使用记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockUsage {
    pub vessel: String,
    pub arrival: NaiveDate,
}

// ==========================================
// ClashTracker - 冲突跟踪器
// ==========================================
#[derive(Debug, Clone)]
pub struct ClashTracker {
    margin_days: i64,
    usage: BTreeMap<String, Vec<BlockUsage>>,
}

impl ClashTracker {
    pub fn new(margin_days: i64) -> Self {
        Self {
            margin_days,
            usage: BTreeMap::new(),
        }
    }

    /// 判断船舶放入箱区是否与其他船舶冲突
    ///
    /// 同一船舶的历史记录不构成冲突
    pub fn is_clashing(&self, vessel: &str, arrival: NaiveDate, block: &str) -> bool {
        self.usage.get(block).map_or(false, |records| {
            records.iter().any(|other| {
                other.vessel != vessel
                    && (arrival - other.arrival).num_days().abs() < self.margin_days
            })
        })
    }

    /// 记录箱区使用（不去重）
    pub fn record_usage(&mut self, vessel: &str, arrival: NaiveDate, block: &str) {
        self.usage
            .entry(block.to_string())
            .or_default()
            .push(BlockUsage {
                vessel: vessel.to_string(),
                arrival,
            });
    }

    pub fn usage_of(&self, block: &str) -> &[BlockUsage] {
        self.usage.get(block).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 船舶是否使用过该箱区
    pub fn has_used(&self, vessel: &str, block: &str) -> bool {
        self.usage_of(block).iter().any(|u| u.vessel == vessel)
    }
}
