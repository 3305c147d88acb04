// ==========================================
// DB 自动分配器 - 引擎层
// ==========================================
// 职责: 分配算法，纯函数，无文件读写
// 红线: 校验失败时不产生部分结果
// ==========================================

pub mod allocator;
pub mod error;

// 重导出核心引擎
pub use allocator::{round_to_tenth, Allocator};
pub use error::{AllocationError, AllocationResult};
