// ==========================================
// DB 自动分配器 - 分配 API
// ==========================================
// 职责: 一次完整运行
//   文件解析 → 订单率映射 → 分配 → (可选) 导出
// 红线: 任一步失败即中止，不产生部分结果或导出文件
// ==========================================

use crate::api::error::ApiResult;
use crate::config::AllocationConfig;
use crate::domain::allocation::AllocationTable;
use crate::domain::dq::DqReport;
use crate::domain::rate::OrderRateTable;
use crate::engine::Allocator;
use crate::export::{export_table, ExportFormat};
use crate::importer::{RateTableMapper, RawSheet, UniversalFileParser};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// AllocationReport - 单次运行结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    pub run_id: Uuid,
    pub batch_label: String,
    pub generated_at: DateTime<Local>,
    pub source: Option<String>, // 订单率文件路径
    pub table: AllocationTable,
    pub dq_report: DqReport,
}

// ==========================================
// AllocationApi
// ==========================================
pub struct AllocationApi {
    config: AllocationConfig,
    allocator: Allocator,
}

impl AllocationApi {
    /// 创建 API 实例（配置先行校验）
    pub fn new(config: AllocationConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            allocator: Allocator::new(),
        })
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// 从订单率文件运行一次分配
    #[instrument(skip(self, path), fields(path = %path.as_ref().display(), batch = %self.config.batch_label))]
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> ApiResult<AllocationReport> {
        let path = path.as_ref();
        let sheet = UniversalFileParser.parse(path)?;
        let mut report = self.run_sheet(&sheet)?;
        report.source = Some(path.display().to_string());
        Ok(report)
    }

    /// 对已解析的表格运行一次分配
    pub fn run_sheet(&self, sheet: &RawSheet) -> ApiResult<AllocationReport> {
        let mapper = RateTableMapper::new(self.config.layout.clone());
        let mapped = mapper.map(sheet, &self.config.product_names())?;

        if mapped.dq_report.has_warnings() {
            warn!(
                warnings = mapped.dq_report.summary.warning,
                "订单率存在无法解析的单元格，已按无数据处理"
            );
        }

        let table = self.run_rates(&mapped.table)?;

        let report = AllocationReport {
            run_id: Uuid::new_v4(),
            batch_label: self.config.batch_label.clone(),
            generated_at: Local::now(),
            source: None,
            table,
            dq_report: mapped.dq_report,
        };

        info!(run_id = %report.run_id, agents = report.table.agent_count(), "分配运行完成");
        Ok(report)
    }

    /// 直接对订单率表分配（不经过文件）
    pub fn run_rates(&self, rates: &OrderRateTable) -> ApiResult<AllocationTable> {
        Ok(self
            .allocator
            .allocate(&self.config.products, rates, self.config.cap)?)
    }

    /// 导出到配置的输出目录
    pub fn export(&self, report: &AllocationReport, format: ExportFormat) -> ApiResult<PathBuf> {
        Ok(export_table(
            &report.table,
            &self.config.output_dir,
            &report.batch_label,
            format,
            report.generated_at,
        )?)
    }
}
