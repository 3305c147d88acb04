// ==========================================
// DB 自动分配器 - 分配结果表
// ==========================================
// 职责: 负责人 × 商品 → 分配数量 + 负责人合计 + 未分配行
// 生命周期: 每次分配新建，生成后不再修改
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 负责人列表头
pub const AGENT_HEADER: &str = "담당자";
/// 合计列表头
pub const TOTAL_HEADER: &str = "총합계";
/// 未分配行标签
pub const REMAINDER_LABEL: &str = "미분배 수량";
/// 未分配行合计单元格占位符（跨商品求和无意义）
pub const TOTAL_PLACEHOLDER: &str = "-";

// ==========================================
// AllocationRow - 负责人分配行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub agent: String,
    pub quantities: Vec<f64>, // 与 AllocationTable::products 一一对应
    pub total: f64,           // 跨商品合计
}

// ==========================================
// RemainderRow - 未分配行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemainderRow {
    pub quantities: Vec<f64>,
}

// ==========================================
// TotalCell - 合计单元格
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TotalCell {
    Sum(f64),
    Placeholder,
}

impl fmt::Display for TotalCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalCell::Sum(v) => write!(f, "{:.1}", v),
            TotalCell::Placeholder => write!(f, "{}", TOTAL_PLACEHOLDER),
        }
    }
}

/// 导出/展示用的统一行视图
#[derive(Debug, Clone, PartialEq)]
pub struct TableRecord<'a> {
    pub label: &'a str,
    pub quantities: &'a [f64],
    pub total: TotalCell,
}

// ==========================================
// AllocationTable - 分配结果表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationTable {
    products: Vec<String>,
    rows: Vec<AllocationRow>,
    remainder: RemainderRow,
    capped_agents: Vec<String>,    // 触发上限缩放的负责人
    unrated_products: Vec<String>, // 订单率合计为 0 的商品
}

impl AllocationTable {
    pub(crate) fn new(
        products: Vec<String>,
        rows: Vec<AllocationRow>,
        remainder: RemainderRow,
        capped_agents: Vec<String>,
        unrated_products: Vec<String>,
    ) -> Self {
        Self {
            products,
            rows,
            remainder,
            capped_agents,
            unrated_products,
        }
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn rows(&self) -> &[AllocationRow] {
        &self.rows
    }

    pub fn remainder(&self) -> &RemainderRow {
        &self.remainder
    }

    pub fn capped_agents(&self) -> &[String] {
        &self.capped_agents
    }

    pub fn unrated_products(&self) -> &[String] {
        &self.unrated_products
    }

    pub fn agent_count(&self) -> usize {
        self.rows.len()
    }

    fn product_index(&self, product: &str) -> Option<usize> {
        self.products.iter().position(|p| p == product)
    }

    pub fn row(&self, agent: &str) -> Option<&AllocationRow> {
        self.rows.iter().find(|r| r.agent == agent)
    }

    /// 查询单元格分配数量
    pub fn allocation(&self, agent: &str, product: &str) -> Option<f64> {
        let idx = self.product_index(product)?;
        self.row(agent).map(|r| r.quantities[idx])
    }

    pub fn agent_total(&self, agent: &str) -> Option<f64> {
        self.row(agent).map(|r| r.total)
    }

    pub fn remainder_for(&self, product: &str) -> Option<f64> {
        let idx = self.product_index(product)?;
        Some(self.remainder.quantities[idx])
    }

    /// 某商品已分配数量合计（所有负责人）
    pub fn allocated_sum(&self, product: &str) -> Option<f64> {
        let idx = self.product_index(product)?;
        Some(self.rows.iter().map(|r| r.quantities[idx]).sum())
    }

    /// 按输出顺序生成行视图：负责人行 + 末尾未分配行
    pub fn records(&self) -> Vec<TableRecord<'_>> {
        let mut records: Vec<TableRecord<'_>> = self
            .rows
            .iter()
            .map(|r| TableRecord {
                label: &r.agent,
                quantities: &r.quantities,
                total: TotalCell::Sum(r.total),
            })
            .collect();

        records.push(TableRecord {
            label: REMAINDER_LABEL,
            quantities: &self.remainder.quantities,
            total: TotalCell::Placeholder,
        });

        records
    }
}
