// ==========================================
// DB 自动分配器 - 比例分配引擎
// ==========================================
// 职责: 按订单率比例分配商品数量 + 人均上限控制
// 输入: 商品列表(名称+总数量) + 订单率表 + 人均上限
// 输出: AllocationTable（含未分配行）
// ==========================================
// 流程:
// 1) 逐商品比例分配（四舍五入至 0.1）
// 2) 负责人并集 → 稠密矩阵（缺失补 0）
// 3) 超出上限的负责人按自身比例缩放至上限
// 4) 逐商品计算未分配数量
// ==========================================

use crate::domain::allocation::{AllocationRow, AllocationTable, RemainderRow};
use crate::domain::product::{product_names, Product};
use crate::domain::rate::{OrderRateTable, RateColumn};
use crate::engine::error::{AllocationError, AllocationResult};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

use super::matrix::{collect_agents, AgentMatrix};

/// 取整至一位小数（恰好 .x5 时取偶数，即银行家舍入）
///
/// 结果为 0 时统一返回 +0.0，避免输出 "-0.0"
pub fn round_to_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0).round_ties_even() / 10.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

// ==========================================
// Allocator - 比例分配引擎
// ==========================================
#[derive(Debug, Default)]
pub struct Allocator {
    // 无状态引擎，所有输入通过参数传入
}

impl Allocator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次完整分配
    ///
    /// # 参数
    /// - `products`: 商品列表（顺序即输出列顺序）
    /// - `rates`: 订单率表，必须包含每个商品的列
    /// - `cap`: 单个负责人跨商品合计上限
    ///
    /// # 返回
    /// - Ok(AllocationTable): 分配结果
    /// - Err(AllocationError): 输入校验失败，不产生任何部分结果
    #[instrument(skip(self, products, rates), fields(product_count = products.len()))]
    pub fn allocate(
        &self,
        products: &[Product],
        rates: &OrderRateTable,
        cap: f64,
    ) -> AllocationResult<AllocationTable> {
        validate_products(products)?;
        validate_cap(cap)?;

        let columns = resolve_columns(products, rates)?;
        let agents = collect_agents(&columns);
        if agents.is_empty() {
            return Err(AllocationError::EmptyAgentSet);
        }

        let (proportional, unrated_products) =
            self.proportional_pass(products, &columns, agents);
        let (capped, capped_agents) = self.enforce_cap(&proportional, cap);
        let remainder = self.remainder_row(products, &capped);

        let rows: Vec<AllocationRow> = capped
            .into_rows()
            .into_iter()
            .map(|(agent, quantities)| {
                let total = round_to_tenth(quantities.iter().sum());
                AllocationRow {
                    agent,
                    quantities,
                    total,
                }
            })
            .collect();

        info!(
            agents = rows.len(),
            capped = capped_agents.len(),
            unrated = unrated_products.len(),
            "分配完成"
        );

        Ok(AllocationTable::new(
            product_names(products),
            rows,
            remainder,
            capped_agents,
            unrated_products,
        ))
    }

    // ==========================================
    // 分配步骤
    // ==========================================

    /// 逐商品比例分配
    ///
    /// 订单率合计为 0 的商品整列保持 0，记入返回的商品列表
    fn proportional_pass(
        &self,
        products: &[Product],
        columns: &[&RateColumn],
        agents: Vec<String>,
    ) -> (AgentMatrix, Vec<String>) {
        let row_of: HashMap<String, usize> = agents
            .iter()
            .enumerate()
            .map(|(idx, agent)| (agent.clone(), idx))
            .collect();
        let agent_count = agents.len();

        let mut matrix = AgentMatrix::zeros(agents, products.len());
        let mut unrated = Vec::new();

        for (col, (product, column)) in products.iter().zip(columns).enumerate() {
            // 同一列内重复出现的负责人合并计算
            let mut weights = vec![0.0; agent_count];
            for (agent, cell) in &column.entries {
                if let Some(&row) = row_of.get(agent) {
                    weights[row] += cell.weight();
                }
            }

            let rate_sum: f64 = weights.iter().sum();
            if !(rate_sum > 0.0 && rate_sum.is_finite()) {
                debug!(product = %product.name, missing = column.missing_count(), "订单率合计为 0，整列不分配");
                unrated.push(product.name.clone());
                continue;
            }

            for (row, weight) in weights.iter().enumerate() {
                if *weight > 0.0 {
                    let ratio = weight / rate_sum;
                    matrix.set(row, col, round_to_tenth(ratio * product.total_quantity));
                }
            }

            debug!(product = %product.name, rate_sum, total_quantity = product.total_quantity, "商品比例分配完成");
        }

        (matrix, unrated)
    }

    /// 人均上限控制
    ///
    /// 仅缩放合计严格大于上限的负责人自身行，其他行原样保留
    fn enforce_cap(&self, matrix: &AgentMatrix, cap: f64) -> (AgentMatrix, Vec<String>) {
        let mut capped_agents = Vec::new();

        let capped = matrix.map_rows(|agent, row| {
            let total = round_to_tenth(row.iter().sum());
            if total > cap {
                debug!(agent, total, cap, "超出人均上限，按比例缩放");
                capped_agents.push(agent.to_string());
                row.iter()
                    .map(|v| round_to_tenth(v / total * cap))
                    .collect()
            } else {
                row.to_vec()
            }
        });

        (capped, capped_agents)
    }

    /// 未分配行：总数量 - 上限控制后的已分配合计
    fn remainder_row(&self, products: &[Product], matrix: &AgentMatrix) -> RemainderRow {
        let quantities = products
            .iter()
            .enumerate()
            .map(|(col, product)| round_to_tenth(product.total_quantity - matrix.column_sum(col)))
            .collect();

        RemainderRow { quantities }
    }
}

// ==========================================
// 输入校验
// ==========================================

fn validate_products(products: &[Product]) -> AllocationResult<()> {
    if products.is_empty() {
        return Err(AllocationError::EmptyProductSet);
    }

    let mut seen = HashSet::new();
    for (index, product) in products.iter().enumerate() {
        if product.name.trim().is_empty() {
            return Err(AllocationError::BlankProductName { index });
        }
        if !seen.insert(product.name.as_str()) {
            return Err(AllocationError::DuplicateProduct(product.name.clone()));
        }
        if !product.total_quantity.is_finite() || product.total_quantity < 0.0 {
            return Err(AllocationError::InvalidQuantity {
                product: product.name.clone(),
                value: product.total_quantity,
            });
        }
    }

    Ok(())
}

fn validate_cap(cap: f64) -> AllocationResult<()> {
    if cap.is_finite() && cap > 0.0 {
        Ok(())
    } else {
        Err(AllocationError::InvalidCap { value: cap })
    }
}

/// 按商品顺序取出订单率列
fn resolve_columns<'a>(
    products: &[Product],
    rates: &'a OrderRateTable,
) -> AllocationResult<Vec<&'a RateColumn>> {
    products
        .iter()
        .map(|product| {
            rates
                .column(&product.name)
                .ok_or_else(|| AllocationError::MissingRateColumn {
                    product: product.name.clone(),
                })
        })
        .collect()
}
