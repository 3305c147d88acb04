// ==========================================
// DB 自动分配器 - 比例分配引擎
// ==========================================
// 职责: 按订单率比例分配 + 人均上限控制 + 未分配行
// 输入: 商品列表 + 订单率表 + 人均上限
// 输出: AllocationTable
// ==========================================

mod core;
mod matrix;


pub use self::core::{round_to_tenth, Allocator};
