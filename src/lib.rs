// ==========================================
// DB 自动分配器 - 核心库
// ==========================================
// 职责: 按负责人订单率比例分配商品数量，并执行人均上限
// 系统定位: 决策支持（分配结果交由人工确认后发放）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分配算法
pub mod engine;

// 导入层 - 订单率文件
pub mod importer;

// 配置层 - 分配参数
pub mod config;

// 导出层 - 结果文件与展示
pub mod export;

// API 层 - 运行编排
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    AllocationRow, AllocationTable, DqReport, OrderRateTable, Product, RateCell, RateColumn,
    RemainderRow,
};

pub use engine::{AllocationError, Allocator};

pub use api::{AllocationApi, AllocationReport, ApiError};

pub use config::AllocationConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "DB 自动分配器";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
