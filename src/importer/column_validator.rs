// ==========================================
// 集装箱堆场排位系统 - 必填列校验
// ==========================================
// 职责: 表头 → 标准列映射（支持别名，大小写不敏感）
// 红线: 缺列一次性全部报告，缺列时不进入模拟
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

// 标准列名
pub const COL_VESSEL: &str = "Vessel";
pub const COL_TOTAL_CONTAINERS: &str = "Total_Containers";
pub const COL_CLUSTER_NEED: &str = "Cluster_Need";
pub const COL_ETA: &str = "ETA";
pub const COL_BERTH: &str = "Berth";

/// 必填列及其别名（第一个为标准列名）
pub const REQUIRED_COLUMNS: &[&[&str]] = &[
    &[COL_VESSEL, "Vessel_Name", "Ship"],
    &[COL_TOTAL_CONTAINERS, "Total", "Containers"],
    &[COL_CLUSTER_NEED, "Clusters", "Cluster"],
    &[COL_ETA, "Arrival", "Arrival_Date"],
    &[COL_BERTH, "Berth_Code"],
];

// ==========================================
// ColumnMapping - 标准列 → 实际表头
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: HashMap<&'static str, String>,
}

impl ColumnMapping {
    /// 标准列对应的实际表头
    pub fn header_for(&self, canonical: &str) -> Option<&str> {
        self.columns.get(canonical).map(String::as_str)
    }

    /// 按标准列取值（去空白，空串视为缺失）
    pub fn value<'r>(&self, row: &'r HashMap<String, String>, canonical: &str) -> Option<&'r str> {
        let header = self.header_for(canonical)?;
        row.get(header)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

// ==========================================
// ColumnValidator
// ==========================================
pub struct ColumnValidator;

impl ColumnValidator {
    pub fn validate(&self, headers: &[String]) -> ImportResult<ColumnMapping> {
        let mut mapping = ColumnMapping::default();
        let mut missing = Vec::new();

        for aliases in REQUIRED_COLUMNS {
            let canonical = aliases[0];
            let found = aliases.iter().find_map(|alias| {
                headers
                    .iter()
                    .find(|h| h.trim().eq_ignore_ascii_case(alias))
                    .cloned()
            });

            match found {
                Some(header) => {
                    mapping.columns.insert(canonical, header);
                }
                None => missing.push(canonical.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_columns_present() {
        let mapping = ColumnValidator
            .validate(&headers(&["Vessel", "Total_Containers", "Cluster_Need", "ETA", "Berth"]))
            .unwrap();
        assert_eq!(mapping.header_for(COL_ETA), Some("ETA"));
    }

    #[test]
    fn test_alias_and_case() {
        let mapping = ColumnValidator
            .validate(&headers(&["vessel", "TOTAL_CONTAINERS", "Cluster_Need", "Arrival_Date", "Berth"]))
            .unwrap();
        assert_eq!(mapping.header_for(COL_ETA), Some("Arrival_Date"));
        assert_eq!(mapping.header_for(COL_VESSEL), Some("vessel"));
    }

    #[test]
    fn test_reports_every_missing_column() {
        let err = ColumnValidator
            .validate(&headers(&["Vessel", "Berth"]))
            .unwrap_err();
        match err {
            ImportError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["Total_Containers", "Cluster_Need", "ETA"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_value_treats_blank_as_missing() {
        let mapping = ColumnValidator
            .validate(&headers(&["Vessel", "Total_Containers", "Cluster_Need", "ETA", "Berth"]))
            .unwrap();
        let mut row = HashMap::new();
        row.insert("Vessel".to_string(), "  ".to_string());
        row.insert("Berth".to_string(), " NP1 ".to_string());

        assert_eq!(mapping.value(&row, COL_VESSEL), None);
        assert_eq!(mapping.value(&row, COL_BERTH), Some("NP1"));
    }
}
