// ==========================================
// DB 自动分配器 - API 层
// ==========================================
// 职责: 编排导入、分配、导出，供命令行或其他宿主调用
// ==========================================

pub mod allocation_api;
pub mod error;

pub use allocation_api::{AllocationApi, AllocationReport};
pub use error::{ApiError, ApiResult};
