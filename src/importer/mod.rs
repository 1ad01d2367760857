// ==========================================
// 集装箱堆场排位系统 - 导入层
// ==========================================
// 职责: 外部船期表 → VesselRecord
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod column_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod vessel_importer;

// 重导出核心类型
pub use column_validator::{ColumnMapping, ColumnValidator};
pub use error::{ImportError, ImportResult};
pub use field_mapper::VesselFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, ParsedSheet, UniversalFileParser};
pub use vessel_importer::VesselImporter;
