// ==========================================
// DB 自动分配器 - 订单率表
// ==========================================
// 职责: (负责人, 商品) → 订单率
// 说明: 无法解析的单元格统一记为 Missing，按 0 参与比例计算
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RateCell - 订单率单元格
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateCell {
    Value(f64), // 有效订单率（有限且 >= 0）
    Missing,    // 无数据
}

impl RateCell {
    /// 由数值构造；非有限值或负数视为无数据
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 {
            RateCell::Value(value)
        } else {
            RateCell::Missing
        }
    }

    /// 参与比例计算的权重（Missing、负数、非有限值均按 0）
    pub fn weight(&self) -> f64 {
        match self {
            RateCell::Value(v) if v.is_finite() && *v > 0.0 => *v,
            _ => 0.0,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RateCell::Missing)
    }

    /// 合并同一负责人的重复记录
    ///
    /// Missing 与任意值合并得到该值；两个有效值相加
    pub fn merge(self, other: RateCell) -> RateCell {
        match (self, other) {
            (RateCell::Value(a), RateCell::Value(b)) => RateCell::Value(a + b),
            (RateCell::Value(a), RateCell::Missing) | (RateCell::Missing, RateCell::Value(a)) => {
                RateCell::Value(a)
            }
            (RateCell::Missing, RateCell::Missing) => RateCell::Missing,
        }
    }
}

impl From<Option<f64>> for RateCell {
    fn from(value: Option<f64>) -> Self {
        value.map(RateCell::from_f64).unwrap_or(RateCell::Missing)
    }
}

// ==========================================
// RateColumn - 单个商品的订单率列
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateColumn {
    pub product: String,
    pub entries: Vec<(String, RateCell)>,
}

impl RateColumn {
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, agent: impl Into<String>, cell: RateCell) {
        self.entries.push((agent.into(), cell));
    }

    /// 订单率合计（Missing 按 0）
    pub fn rate_sum(&self) -> f64 {
        self.entries.iter().map(|(_, cell)| cell.weight()).sum()
    }

    /// 无数据单元格数量
    pub fn missing_count(&self) -> usize {
        self.entries.iter().filter(|(_, cell)| cell.is_missing()).count()
    }
}

// ==========================================
// OrderRateTable - 订单率表
// ==========================================
// 按商品分列存储；各列负责人集合可以不同
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRateTable {
    columns: Vec<RateColumn>,
}

impl OrderRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: Vec<RateColumn>) -> Self {
        Self { columns }
    }

    /// 由按行组织的数据构造（每行: 负责人 + 与 products 等长的单元格）
    ///
    /// 行长度不足时缺失部分记为 Missing
    pub fn from_agent_rows(products: &[String], rows: Vec<(String, Vec<RateCell>)>) -> Self {
        let mut columns: Vec<RateColumn> = products.iter().map(RateColumn::new).collect();

        for (agent, cells) in rows {
            for (idx, column) in columns.iter_mut().enumerate() {
                let cell = cells.get(idx).copied().unwrap_or(RateCell::Missing);
                column.push(agent.clone(), cell);
            }
        }

        Self { columns }
    }

    pub fn add_column(&mut self, column: RateColumn) {
        self.columns.push(column);
    }

    pub fn columns(&self) -> &[RateColumn] {
        &self.columns
    }

    /// 按商品名称查找列
    pub fn column(&self, product: &str) -> Option<&RateColumn> {
        self.columns.iter().find(|c| c.product == product)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|c| c.entries.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_cell_from_invalid_values() {
        assert_eq!(RateCell::from_f64(f64::NAN), RateCell::Missing);
        assert_eq!(RateCell::from_f64(f64::INFINITY), RateCell::Missing);
        assert_eq!(RateCell::from_f64(-1.0), RateCell::Missing);
        assert_eq!(RateCell::from_f64(0.0), RateCell::Value(0.0));
        assert_eq!(RateCell::from(None), RateCell::Missing);
    }

    #[test]
    fn test_weight_ignores_out_of_range_values() {
        assert_eq!(RateCell::Value(-1.0).weight(), 0.0);
        assert_eq!(RateCell::Value(f64::NAN).weight(), 0.0);
        assert_eq!(RateCell::Value(f64::INFINITY).weight(), 0.0);
        assert_eq!(RateCell::Value(2.5).weight(), 2.5);

        let mut column = RateColumn::new("A");
        column.push("X", RateCell::Value(3.0));
        column.push("Y", RateCell::Value(-1.0));
        assert_eq!(column.rate_sum(), 3.0);
    }

    #[test]
    fn test_rate_cell_merge() {
        assert_eq!(
            RateCell::Value(1.0).merge(RateCell::Value(2.5)),
            RateCell::Value(3.5)
        );
        assert_eq!(
            RateCell::Missing.merge(RateCell::Value(2.0)),
            RateCell::Value(2.0)
        );
        assert_eq!(RateCell::Missing.merge(RateCell::Missing), RateCell::Missing);
    }

    #[test]
    fn test_from_agent_rows_pads_short_rows() {
        let products = vec!["A".to_string(), "B".to_string()];
        let table = OrderRateTable::from_agent_rows(
            &products,
            vec![("X".to_string(), vec![RateCell::Value(3.0)])],
        );

        let b = table.column("B").unwrap();
        assert_eq!(b.entries, vec![("X".to_string(), RateCell::Missing)]);
        assert_eq!(b.missing_count(), 1);
        assert_eq!(table.column("A").unwrap().rate_sum(), 3.0);
    }
}
