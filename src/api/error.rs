// ==========================================
// DB 自动分配器 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，向调用方给出可定位的失败原因
// ==========================================

use crate::config::ConfigError;
use crate::engine::AllocationError;
use crate::export::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("输入校验失败: {0}")]
    Allocation(#[from] AllocationError),

    #[error("结果导出失败: {0}")]
    Export(#[from] ExportError),
}

impl ApiError {
    /// 是否属于输入校验类错误（调用方应提示修正输入后重试）
    pub fn is_input_validation(&self) -> bool {
        match self {
            ApiError::Config(_) | ApiError::Allocation(_) => true,
            ApiError::Import(err) => matches!(
                err,
                ImportError::MissingColumn { .. }
                    | ImportError::HeaderMissing
                    | ImportError::NoDataRows
            ),
            ApiError::Export(_) => false,
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
