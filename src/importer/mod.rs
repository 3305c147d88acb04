// ==========================================
// DB 自动分配器 - 导入层
// ==========================================
// 职责: 订单率文件读取 → 订单率表
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod rate_mapper;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, RawSheet, UniversalFileParser};
pub use rate_mapper::{parse_rate_cell, CellParse, MappedRates, RateTableMapper};
