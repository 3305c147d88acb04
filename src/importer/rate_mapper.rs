// ==========================================
// DB 自动分配器 - 订单率映射器
// ==========================================
// 职责: 原始表格 → OrderRateTable + 数据质量报告
// 列定位: 表头包含全部商品名时按名称，否则按列位置
// 单元格: 无法解析的值记为无数据（警告），不中断导入
// ==========================================

use crate::config::ColumnLayout;
use crate::domain::allocation::AGENT_HEADER;
use crate::domain::dq::{DqLevel, DqReport, DqViolation};
use crate::domain::rate::{OrderRateTable, RateCell};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawSheet;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// 单元格解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellParse {
    Value(f64),
    Blank,
    Invalid(&'static str),
}

/// 解析订单率单元格
///
/// 允许千分位逗号与末尾百分号；负数、非有限值视为无效
pub fn parse_rate_cell(raw: &str) -> CellParse {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellParse::Blank;
    }

    let normalized: String = trimmed
        .trim_end_matches('%')
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .collect();

    match normalized.parse::<f64>() {
        Err(_) => CellParse::Invalid("无法解析为数值"),
        Ok(v) if !v.is_finite() => CellParse::Invalid("非有限数值"),
        Ok(v) if v < 0.0 => CellParse::Invalid("订单率为负数"),
        Ok(v) => CellParse::Value(v),
    }
}

/// 映射结果
#[derive(Debug, Clone)]
pub struct MappedRates {
    pub table: OrderRateTable,
    pub dq_report: DqReport,
}

// ==========================================
// RateTableMapper - 订单率映射器
// ==========================================
pub struct RateTableMapper {
    layout: ColumnLayout,
}

impl RateTableMapper {
    pub fn new(layout: ColumnLayout) -> Self {
        Self { layout }
    }

    /// 映射原始表格
    ///
    /// # 参数
    /// - `sheet`: 文件解析结果
    /// - `products`: 商品名称（决定列顺序）
    ///
    /// # 返回
    /// - Ok(MappedRates): 订单率表 + 数据质量报告
    /// - Err(ImportError): 无数据行或缺少必需列
    #[instrument(skip_all, fields(rows = sheet.rows.len(), products = products.len()))]
    pub fn map(&self, sheet: &RawSheet, products: &[String]) -> ImportResult<MappedRates> {
        if sheet.rows.is_empty() {
            return Err(ImportError::NoDataRows);
        }

        let columns = self.resolve_columns(&sheet.headers, products)?;

        let mut report = DqReport::default();
        report.summary.total_rows = sheet.rows.len();

        let mut rows: Vec<(String, Vec<RateCell>)> = Vec::new();
        let mut row_of: HashMap<String, usize> = HashMap::new();

        for raw in &sheet.rows {
            let agent = raw.cell(self.layout.agent_column).trim().to_string();
            if agent.is_empty() {
                report.push(DqViolation {
                    row_number: raw.row_number,
                    agent: None,
                    level: DqLevel::Warning,
                    field: AGENT_HEADER.to_string(),
                    message: "负责人为空，已跳过该行".to_string(),
                });
                continue;
            }

            let mut cells = Vec::with_capacity(products.len());
            for (product, &col) in products.iter().zip(&columns) {
                let value = raw.cell(col);
                let cell = match parse_rate_cell(value) {
                    CellParse::Value(v) => RateCell::Value(v),
                    CellParse::Blank => {
                        report.push(DqViolation {
                            row_number: raw.row_number,
                            agent: Some(agent.clone()),
                            level: DqLevel::Info,
                            field: product.clone(),
                            message: "空单元格，按无数据处理".to_string(),
                        });
                        RateCell::Missing
                    }
                    CellParse::Invalid(reason) => {
                        warn!(row = raw.row_number, agent = %agent, product = %product, value, "{}", reason);
                        report.push(DqViolation {
                            row_number: raw.row_number,
                            agent: Some(agent.clone()),
                            level: DqLevel::Warning,
                            field: product.clone(),
                            message: format!("{}: {}，按无数据处理", reason, value),
                        });
                        RateCell::Missing
                    }
                };
                cells.push(cell);
            }

            match row_of.get(&agent) {
                Some(&idx) => {
                    report.push(DqViolation {
                        row_number: raw.row_number,
                        agent: Some(agent.clone()),
                        level: DqLevel::Warning,
                        field: AGENT_HEADER.to_string(),
                        message: "负责人重复，订单率已合并".to_string(),
                    });
                    let existing = &mut rows[idx].1;
                    for (slot, cell) in existing.iter_mut().zip(cells) {
                        *slot = slot.merge(cell);
                    }
                }
                None => {
                    row_of.insert(agent.clone(), rows.len());
                    rows.push((agent, cells));
                }
            }
        }

        report.summary.agent_rows = rows.len();
        debug!(
            agents = rows.len(),
            warnings = report.summary.warning,
            "订单率映射完成"
        );

        Ok(MappedRates {
            table: OrderRateTable::from_agent_rows(products, rows),
            dq_report: report,
        })
    }

    /// 定位负责人列与各商品列
    fn resolve_columns(&self, headers: &[String], products: &[String]) -> ImportResult<Vec<usize>> {
        if self.layout.agent_column >= headers.len() {
            return Err(ImportError::MissingColumn {
                column: AGENT_HEADER.to_string(),
                position: self.layout.agent_column + 1,
            });
        }

        if self.layout.match_headers {
            let by_name: Option<Vec<usize>> = products
                .iter()
                .map(|product| {
                    headers
                        .iter()
                        .position(|h| h.trim().eq_ignore_ascii_case(product.trim()))
                })
                .collect();

            if let Some(columns) = by_name {
                debug!(?columns, "按表头名称定位商品列");
                return Ok(columns);
            }
        }

        products
            .iter()
            .enumerate()
            .map(|(i, product)| {
                let position = self.layout.first_product_column + i;
                if position < headers.len() {
                    Ok(position)
                } else {
                    Err(ImportError::MissingColumn {
                        column: product.clone(),
                        position: position + 1,
                    })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::RawRow;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> RawSheet {
        RawSheet {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(idx, cells)| RawRow {
                    row_number: idx + 2,
                    cells: cells.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_rate_cell() {
        assert_eq!(parse_rate_cell(" 3.5 "), CellParse::Value(3.5));
        assert_eq!(parse_rate_cell("1,200"), CellParse::Value(1200.0));
        assert_eq!(parse_rate_cell("35%"), CellParse::Value(35.0));
        assert_eq!(parse_rate_cell(""), CellParse::Blank);
        assert!(matches!(parse_rate_cell("abc"), CellParse::Invalid(_)));
        assert!(matches!(parse_rate_cell("-1"), CellParse::Invalid(_)));
        assert!(matches!(parse_rate_cell("NaN"), CellParse::Invalid(_)));
    }

    #[test]
    fn test_positional_mapping() {
        let raw = sheet(
            &["No", "이름", "col1", "col2"],
            &[&["1", "X", "3", "1"], &["2", "Y", "1", "abc"]],
        );

        let mapped = RateTableMapper::new(ColumnLayout::default())
            .map(&raw, &names(&["A", "B"]))
            .unwrap();

        let b = mapped.table.column("B").unwrap();
        assert_eq!(b.entries[0], ("X".to_string(), RateCell::Value(1.0)));
        assert_eq!(b.entries[1], ("Y".to_string(), RateCell::Missing));
        assert_eq!(mapped.dq_report.summary.warning, 1);
        assert_eq!(mapped.dq_report.violations[0].row_number, 3);
        assert_eq!(mapped.dq_report.violations[0].field, "B");
    }

    #[test]
    fn test_header_mapping_ignores_column_order() {
        let raw = sheet(&["No", "담당자", "B", "A"], &[&["1", "X", "1", "3"]]);

        let mapped = RateTableMapper::new(ColumnLayout::default())
            .map(&raw, &names(&["A", "B"]))
            .unwrap();

        assert_eq!(
            mapped.table.column("A").unwrap().entries[0].1,
            RateCell::Value(3.0)
        );
        assert_eq!(
            mapped.table.column("B").unwrap().entries[0].1,
            RateCell::Value(1.0)
        );
    }

    #[test]
    fn test_missing_product_column() {
        let raw = sheet(&["No", "담당자", "A"], &[&["1", "X", "3"]]);

        let err = RateTableMapper::new(ColumnLayout::default())
            .map(&raw, &names(&["A", "B"]))
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::MissingColumn { ref column, position: 4 } if column == "B"
        ));
    }

    #[test]
    fn test_blank_agent_skipped_and_duplicates_merged() {
        let raw = sheet(
            &["No", "담당자", "A"],
            &[&["1", "X", "3"], &["2", "", "5"], &["3", "X", "2"]],
        );

        let mapped = RateTableMapper::new(ColumnLayout::default())
            .map(&raw, &names(&["A"]))
            .unwrap();

        let a = mapped.table.column("A").unwrap();
        assert_eq!(a.entries, vec![("X".to_string(), RateCell::Value(5.0))]);
        assert_eq!(mapped.dq_report.summary.agent_rows, 1);
        assert_eq!(mapped.dq_report.summary.warning, 2);
    }

    #[test]
    fn test_no_data_rows() {
        let raw = sheet(&["No", "담당자", "A"], &[]);
        let err = RateTableMapper::new(ColumnLayout::default())
            .map(&raw, &names(&["A"]))
            .unwrap_err();
        assert!(matches!(err, ImportError::NoDataRows));
    }
}
