// ==========================================
// DB 自动分配器 - 分配结果导出
// ==========================================
// 职责: AllocationTable → Excel / CSV / JSON 文件
// 文件名: 상품분배_{回次名}_{YYYY-MM-DD_HHMM}.{ext}
// ==========================================

use crate::domain::allocation::{
    AllocationTable, TotalCell, AGENT_HEADER, TOTAL_HEADER, TOTAL_PLACEHOLDER,
};
use crate::export::error::{ExportError, ExportResult};
use chrono::{DateTime, Local};
use csv::Writer;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// 导出文件名前缀
pub const FILE_PREFIX: &str = "상품분배";
/// Excel 导出的工作表名
pub const SHEET_NAME: &str = "분배표";

// ==========================================
// ExportFormat - 导出格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// 写入任意输出流
    pub fn write<W: Write>(&self, table: &AllocationTable, writer: W) -> ExportResult<()> {
        match self {
            ExportFormat::Xlsx => write_xlsx(table, writer),
            ExportFormat::Csv => write_csv(table, writer),
            ExportFormat::Json => write_json(table, writer),
        }
    }
}

/// 生成导出文件名（回次名中的路径分隔符替换为 '_'）
pub fn file_name(batch_label: &str, now: DateTime<Local>, format: ExportFormat) -> String {
    let label: String = batch_label
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();

    format!(
        "{}_{}_{}.{}",
        FILE_PREFIX,
        label,
        now.format("%Y-%m-%d_%H%M"),
        format.extension()
    )
}

/// 写入 CSV：表头 + 负责人行 + 未分配行（合计列为占位符）
pub fn write_csv<W: Write>(table: &AllocationTable, writer: W) -> ExportResult<()> {
    let mut wtr = Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(table.products().len() + 2);
    header.push(AGENT_HEADER);
    header.extend(table.products().iter().map(String::as_str));
    header.push(TOTAL_HEADER);
    wtr.write_record(&header)?;

    for record in table.records() {
        let mut row: Vec<String> = Vec::with_capacity(record.quantities.len() + 2);
        row.push(record.label.to_string());
        row.extend(record.quantities.iter().map(|q| format!("{:.1}", q)));
        row.push(record.total.to_string());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// 写入 Excel：布局与 CSV 相同，数量单元格按 "0.0" 显示
pub fn write_xlsx<W: Write>(table: &AllocationTable, mut writer: W) -> ExportResult<()> {
    let mut workbook = Workbook::new();
    let quantity_format = Format::new().set_num_format("0.0");

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let last_col = (table.products().len() + 1) as u16;
        worksheet.write_string(0, 0, AGENT_HEADER)?;
        for (idx, product) in table.products().iter().enumerate() {
            worksheet.write_string(0, (idx + 1) as u16, product.as_str())?;
        }
        worksheet.write_string(0, last_col, TOTAL_HEADER)?;

        for (idx, record) in table.records().into_iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, record.label)?;
            for (col, quantity) in record.quantities.iter().enumerate() {
                worksheet.write_number_with_format(
                    row,
                    (col + 1) as u16,
                    *quantity,
                    &quantity_format,
                )?;
            }
            match record.total {
                TotalCell::Sum(total) => {
                    worksheet.write_number_with_format(row, last_col, total, &quantity_format)?;
                }
                TotalCell::Placeholder => {
                    worksheet.write_string(row, last_col, TOTAL_PLACEHOLDER)?;
                }
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;
    writer.write_all(&buffer)?;
    Ok(())
}

/// 写入 JSON（AllocationTable 的 serde 形式）
pub fn write_json<W: Write>(table: &AllocationTable, writer: W) -> ExportResult<()> {
    serde_json::to_writer_pretty(writer, table)?;
    Ok(())
}

/// 导出到目录，目录不存在时自动创建
///
/// # 返回
/// 写入的文件路径
pub fn export_table(
    table: &AllocationTable,
    output_dir: &Path,
    batch_label: &str,
    format: ExportFormat,
    now: DateTime<Local>,
) -> ExportResult<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| ExportError::CreateDirError {
        path: output_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let path = output_dir.join(file_name(batch_label, now, format));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    format.write(table, &mut writer)?;
    writer.flush()?;

    info!(path = %path.display(), format = format.extension(), "分配结果已导出");
    Ok(path)
}
