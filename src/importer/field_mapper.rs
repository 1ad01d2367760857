// ==========================================
// 集装箱堆场排位系统 - 字段映射器实现
// ==========================================
// 职责: 原始行 → VesselRecord + 类型转换
// 日期: YYYY-MM-DD / YYYYMMDD / DD/MM/YYYY / 日期时间 / Excel 序列号
// ==========================================

use crate::domain::types::Berth;
use crate::domain::vessel::VesselRecord;
use crate::importer::column_validator::{
    ColumnMapping, COL_BERTH, COL_CLUSTER_NEED, COL_ETA, COL_TOTAL_CONTAINERS, COL_VESSEL,
};
use crate::importer::error::{ImportError, ImportResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

// Excel 序列号上限 (9999-12-31)
const EXCEL_SERIAL_MAX: f64 = 2_958_465.0;

pub struct VesselFieldMapper {
    mapping: ColumnMapping,
}

impl VesselFieldMapper {
    pub fn new(mapping: ColumnMapping) -> Self {
        Self { mapping }
    }

    /// 单行映射
    ///
    /// # 参数
    /// - row: 原始行（列名 → 值）
    /// - row_number: 数据行号（从 1 开始，用于报错）
    pub fn map_row(&self, row: &HashMap<String, String>, row_number: usize) -> ImportResult<VesselRecord> {
        let vessel = self.required(row, COL_VESSEL, row_number)?.to_string();
        let total_containers = self.parse_total(row, row_number)?;
        let cluster_need = self.parse_cluster_need(row, row_number)?;
        let eta = self.parse_date(row, COL_ETA, row_number)?;
        let berth = Berth::from_code(self.required(row, COL_BERTH, row_number)?);

        Ok(VesselRecord {
            vessel,
            total_containers,
            cluster_need,
            eta,
            berth,
        })
    }

    fn required<'r>(&self, row: &'r HashMap<String, String>, field: &str, row_number: usize) -> ImportResult<&'r str> {
        self.mapping
            .value(row, field)
            .ok_or_else(|| ImportError::MissingValue {
                row: row_number,
                field: field.to_string(),
            })
    }

    /// 总箱量：允许小数，不允许负数
    fn parse_total(&self, row: &HashMap<String, String>, row_number: usize) -> ImportResult<f64> {
        let value = self.required(row, COL_TOTAL_CONTAINERS, row_number)?;
        let total = value
            .parse::<f64>()
            .map_err(|_| ImportError::TypeConversionError {
                row: row_number,
                field: COL_TOTAL_CONTAINERS.to_string(),
                message: format!("无法解析为数值: {}", value),
            })?;

        if !total.is_finite() || total < 0.0 {
            return Err(ImportError::TypeConversionError {
                row: row_number,
                field: COL_TOTAL_CONTAINERS.to_string(),
                message: format!("箱量必须为非负数: {}", value),
            });
        }
        Ok(total)
    }

    /// 簇数提示：正整数（Excel 数值单元格 "3.0" 也接受）
    fn parse_cluster_need(&self, row: &HashMap<String, String>, row_number: usize) -> ImportResult<i64> {
        let value = self.required(row, COL_CLUSTER_NEED, row_number)?;
        let conversion_error = |message: String| ImportError::TypeConversionError {
            row: row_number,
            field: COL_CLUSTER_NEED.to_string(),
            message,
        };

        let parsed = match value.parse::<i64>() {
            Ok(n) => n,
            Err(_) => {
                let f = value
                    .parse::<f64>()
                    .map_err(|_| conversion_error(format!("无法解析为整数: {}", value)))?;
                if f.fract() != 0.0 || !f.is_finite() {
                    return Err(conversion_error(format!("簇数必须为整数: {}", value)));
                }
                f as i64
            }
        };

        if parsed <= 0 {
            return Err(conversion_error(format!("簇数必须为正整数: {}", value)));
        }
        Ok(parsed)
    }

    fn parse_date(&self, row: &HashMap<String, String>, field: &str, row_number: usize) -> ImportResult<NaiveDate> {
        let value = self.required(row, field, row_number)?;
        parse_date_value(value).ok_or_else(|| ImportError::DateFormatError {
            row: row_number,
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// 解析日期文本；无法识别返回 None
pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    // Excel 序列号（1900 日期系统，基准 1899-12-30）
    let serial = value.parse::<f64>().ok()?;
    if !(1.0..=EXCEL_SERIAL_MAX).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.floor() as i64))
}
