// ==========================================
// DB 自动分配器 - 商品实体
// ==========================================
// 职责: 商品名称 + 待分配总数量
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品
// ==========================================
// 商品集合在分配前固定，顺序即输出列顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,        // 商品名称（同时作为列名）
    pub total_quantity: f64, // 待分配总数量（>= 0）
}

impl Product {
    pub fn new(name: impl Into<String>, total_quantity: f64) -> Self {
        Self {
            name: name.into(),
            total_quantity,
        }
    }
}

/// 提取商品名称列表（保持原顺序）
pub fn product_names(products: &[Product]) -> Vec<String> {
    products.iter().map(|p| p.name.clone()).collect()
}
