// ==========================================
// 集装箱堆场排位系统 - 船期导入器
// ==========================================
// 流程: 解析 → 必填列校验 → 字段映射 → 重名检测
// 红线: 任一步失败即中止，不返回部分结果
// ==========================================

use crate::domain::vessel::VesselRecord;
use crate::importer::column_validator::ColumnValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::VesselFieldMapper;
use crate::importer::file_parser::{ParsedSheet, UniversalFileParser};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

// ==========================================
// VesselImporter
// ==========================================
#[derive(Default)]
pub struct VesselImporter;

impl VesselImporter {
    pub fn new() -> Self {
        Self
    }

    /// 从文件导入船期
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<Vec<VesselRecord>> {
        let sheet = UniversalFileParser.parse(path.as_ref())?;
        debug!(
            headers = sheet.headers.len(),
            rows = sheet.rows.len(),
            "文件解析完成"
        );

        let records = self.import_sheet(&sheet)?;
        info!(vessel_count = records.len(), "船期导入完成");
        Ok(records)
    }

    /// 已解析工作表 → 船舶记录
    pub fn import_sheet(&self, sheet: &ParsedSheet) -> ImportResult<Vec<VesselRecord>> {
        let mapping = ColumnValidator.validate(&sheet.headers)?;
        if sheet.rows.is_empty() {
            return Err(ImportError::EmptyInput);
        }

        let mapper = VesselFieldMapper::new(mapping);
        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(sheet.rows.len());

        for (idx, row) in sheet.rows.iter().enumerate() {
            let row_number = idx + 1;
            let record = mapper.map_row(row, row_number)?;

            if !seen.insert(record.vessel.clone()) {
                return Err(ImportError::DuplicateVessel {
                    row: row_number,
                    vessel: record.vessel,
                });
            }
            records.push(record);
        }

        Ok(records)
    }
}
