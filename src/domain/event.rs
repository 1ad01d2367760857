// ==========================================
// 集装箱堆场排位系统 - 事件日志
// ==========================================
// 职责: 收箱/补收/装船/冲突跳过/容量不足/完成 事件记录
// 说明: 只追加; 展示时按 (日期, 描述) 排序
// ==========================================

use crate::domain::types::EventKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// YardEvent - 堆场事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YardEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub vessel: String,
    pub cluster: Option<String>,
    pub block: Option<String>,
    pub quantity: u32,
    pub description: String,
}

impl YardEvent {
    pub fn receive(date: NaiveDate, vessel: &str, cluster: &str, quantity: u32) -> Self {
        Self::cluster_event(date, EventKind::Receive, vessel, cluster, quantity, "+")
    }

    pub fn receive_final(date: NaiveDate, vessel: &str, cluster: &str, quantity: u32) -> Self {
        Self::cluster_event(date, EventKind::ReceiveFinal, vessel, cluster, quantity, "+")
    }

    pub fn load(date: NaiveDate, vessel: &str, cluster: &str, quantity: u32) -> Self {
        Self::cluster_event(date, EventKind::Load, vessel, cluster, quantity, "-")
    }

    pub fn clash_skip(date: NaiveDate, vessel: &str, cluster: &str, block: &str) -> Self {
        Self {
            date,
            kind: EventKind::ClashSkip,
            vessel: vessel.to_string(),
            cluster: Some(cluster.to_string()),
            block: Some(block.to_string()),
            quantity: 0,
            description: format!(
                "{} {} skip block {} (arrival clash)",
                EventKind::ClashSkip.tag(),
                cluster,
                block
            ),
        }
    }

    pub fn shortfall(date: NaiveDate, vessel: &str, cluster: &str, leftover: u32) -> Self {
        Self {
            date,
            kind: EventKind::Shortfall,
            vessel: vessel.to_string(),
            cluster: Some(cluster.to_string()),
            block: None,
            quantity: leftover,
            description: format!(
                "{} {} unplaced {} (yard full)",
                EventKind::Shortfall.tag(),
                cluster,
                leftover
            ),
        }
    }

    pub fn complete(date: NaiveDate, vessel: &str) -> Self {
        Self {
            date,
            kind: EventKind::Complete,
            vessel: vessel.to_string(),
            cluster: None,
            block: None,
            quantity: 0,
            description: format!("{} {} loading complete", EventKind::Complete.tag(), vessel),
        }
    }

    fn cluster_event(
        date: NaiveDate,
        kind: EventKind,
        vessel: &str,
        cluster: &str,
        quantity: u32,
        sign: &str,
    ) -> Self {
        Self {
            date,
            kind,
            vessel: vessel.to_string(),
            cluster: Some(cluster.to_string()),
            block: None,
            quantity,
            description: format!("{} {} {}{}", kind.tag(), cluster, sign, quantity),
        }
    }
}

// ==========================================
// EventLog - 事件日志
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<YardEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: YardEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 按记录顺序
    pub fn events(&self) -> &[YardEvent] {
        &self.events
    }

    /// 按 (日期, 描述) 排序
    pub fn sorted(&self) -> Vec<YardEvent> {
        let mut sorted = self.events.clone();
        sorted.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.description.cmp(&b.description))
        });
        sorted
    }

    pub fn into_sorted(mut self) -> Vec<YardEvent> {
        self.events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.description.cmp(&b.description))
        });
        self.events
    }
}
