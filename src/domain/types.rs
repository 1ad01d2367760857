// ==========================================
// 集装箱堆场排位系统 - 领域类型定义
// ==========================================
// 职责: 泊位、船舶阶段、事件类型、静态排位顺序
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 泊位 (Berth)
// ==========================================
// 泊位决定箱区前缀的偏好顺序
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Berth {
    NP1,
    NP2,
    NP3,
    Other(String),
}

impl Berth {
    /// 从泊位代码解析（大小写不敏感，未知代码保留原文）
    pub fn from_code(code: &str) -> Self {
        let normalized = code.trim().to_uppercase();
        match normalized.as_str() {
            "NP1" => Berth::NP1,
            "NP2" => Berth::NP2,
            "NP3" => Berth::NP3,
            _ => Berth::Other(normalized),
        }
    }

    /// 箱区前缀偏好顺序
    ///
    /// - NP1 → A, B, C
    /// - NP2 → B, A, C
    /// - NP3 → C, B, A
    /// - 其他 → A, B, C
    pub fn block_preference(&self) -> [&'static str; 3] {
        match self {
            Berth::NP1 => ["A", "B", "C"],
            Berth::NP2 => ["B", "A", "C"],
            Berth::NP3 => ["C", "B", "A"],
            Berth::Other(_) => ["A", "B", "C"],
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Berth::NP1 => "NP1",
            Berth::NP2 => "NP2",
            Berth::NP3 => "NP3",
            Berth::Other(code) => code.as_str(),
        }
    }
}

impl fmt::Display for Berth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 船舶阶段 (Vessel Phase)
// ==========================================
// 由日期比较推导，不单独存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VesselPhase {
    Pending,   // 收箱窗口之前
    Receiving, // 收箱窗口内（含到港日补收，当日同时装船）
    Loading,   // 到港日之后的装船窗口
    Done,      // 已完成
}

impl fmt::Display for VesselPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VesselPhase::Pending => write!(f, "PENDING"),
            VesselPhase::Receiving => write!(f, "RECEIVING"),
            VesselPhase::Loading => write!(f, "LOADING"),
            VesselPhase::Done => write!(f, "DONE"),
        }
    }
}

// ==========================================
// 事件类型 (Event Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Receive,      // 日常收箱
    ReceiveFinal, // 到港日补收
    Load,         // 装船
    ClashSkip,    // 冲突跳过箱区
    Shortfall,    // 堆场容量不足
    Complete,     // 船舶完成
}

impl EventKind {
    /// 日志标签（事件描述前缀）
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::Receive => "[RECV]",
            EventKind::ReceiveFinal => "[RECV-FINAL]",
            EventKind::Load => "[LOAD]",
            EventKind::ClashSkip => "[CLASH]",
            EventKind::Shortfall => "[SHORT]",
            EventKind::Complete => "[DONE]",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Receive => "RECEIVE",
            EventKind::ReceiveFinal => "RECEIVE_FINAL",
            EventKind::Load => "LOAD",
            EventKind::ClashSkip => "CLASH_SKIP",
            EventKind::Shortfall => "SHORTFALL",
            EventKind::Complete => "COMPLETE",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RECEIVE" => Ok(EventKind::Receive),
            "RECEIVE_FINAL" => Ok(EventKind::ReceiveFinal),
            "LOAD" => Ok(EventKind::Load),
            "CLASH_SKIP" => Ok(EventKind::ClashSkip),
            "SHORTFALL" => Ok(EventKind::Shortfall),
            "COMPLETE" => Ok(EventKind::Complete),
            other => Err(format!("未知事件类型: {}", other)),
        }
    }
}

// ==========================================
// 静态排位槽位顺序 (Static Slot Order)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticSlotOrder {
    /// 全局槽位顺序
    Flat,
    /// 按泊位偏好排序后的槽位顺序
    BerthPreference,
}

impl StaticSlotOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaticSlotOrder::Flat => "flat",
            StaticSlotOrder::BerthPreference => "berth_preference",
        }
    }
}

impl Default for StaticSlotOrder {
    fn default() -> Self {
        StaticSlotOrder::Flat
    }
}

impl std::str::FromStr for StaticSlotOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(StaticSlotOrder::Flat),
            "berth_preference" | "berth-preference" | "berth" => {
                Ok(StaticSlotOrder::BerthPreference)
            }
            other => Err(format!("未知槽位顺序: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_berth_preference_order() {
        assert_eq!(Berth::NP1.block_preference(), ["A", "B", "C"]);
        assert_eq!(Berth::NP2.block_preference(), ["B", "A", "C"]);
        assert_eq!(Berth::NP3.block_preference(), ["C", "B", "A"]);
        assert_eq!(Berth::from_code("xx").block_preference(), ["A", "B", "C"]);
    }

    #[test]
    fn test_berth_from_code_normalizes() {
        assert_eq!(Berth::from_code(" np2 "), Berth::NP2);
        assert_eq!(Berth::from_code("jict"), Berth::Other("JICT".to_string()));
        assert_eq!(Berth::from_code("jict").to_string(), "JICT");
    }

    #[test]
    fn test_static_slot_order_from_str() {
        assert_eq!("flat".parse::<StaticSlotOrder>(), Ok(StaticSlotOrder::Flat));
        assert_eq!(
            "berth-preference".parse::<StaticSlotOrder>(),
            Ok(StaticSlotOrder::BerthPreference)
        );
        assert!("random".parse::<StaticSlotOrder>().is_err());
    }

    #[test]
    fn test_event_kind_roundtrip_str() {
        for kind in [
            EventKind::Receive,
            EventKind::ReceiveFinal,
            EventKind::Load,
            EventKind::ClashSkip,
            EventKind::Shortfall,
            EventKind::Complete,
        ] {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
    }
}
