// ==========================================
// DB 自动分配器 - 分配引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 全部为输入校验错误，发生时不产生任何结果表
// ==========================================

use thiserror::Error;

/// 分配引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("商品集合为空")]
    EmptyProductSet,

    #[error("订单率表中没有任何负责人")]
    EmptyAgentSet,

    #[error("商品名称为空 (第 {index} 个商品)")]
    BlankProductName { index: usize },

    #[error("商品重复: {0}")]
    DuplicateProduct(String),

    #[error("商品总数量无效 (商品 {product}): {value}，必须为有限且 >= 0 的数值")]
    InvalidQuantity { product: String, value: f64 },

    #[error("人均上限无效: {value}，必须为有限且 > 0 的数值")]
    InvalidCap { value: f64 },

    #[error("订单率表缺少商品列: {product}")]
    MissingRateColumn { product: String },
}

/// Result 类型别名
pub type AllocationResult<T> = Result<T, AllocationError>;
