// ==========================================
// DB 自动分配器 - 领域模型层
// ==========================================
// 职责: 定义商品、订单率表、分配结果表、数据质量记录
// 红线: 不含文件读写逻辑,不含分配算法
// ==========================================

pub mod allocation;
pub mod dq;
pub mod product;
pub mod rate;

// 重导出核心类型
pub use allocation::{
    AllocationRow, AllocationTable, RemainderRow, TableRecord, TotalCell, AGENT_HEADER,
    REMAINDER_LABEL, TOTAL_HEADER, TOTAL_PLACEHOLDER,
};
pub use dq::{DqLevel, DqReport, DqSummary, DqViolation};
pub use product::{product_names, Product};
pub use rate::{OrderRateTable, RateCell, RateColumn};
