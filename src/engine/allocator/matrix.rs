// ==========================================
// DB 自动分配器 - 负责人 × 商品 稠密矩阵
// ==========================================
// 负责人集合在建表前一次性求并集，缺失单元格默认 0
// ==========================================

use crate::domain::rate::RateColumn;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AgentMatrix {
    agents: Vec<String>,
    width: usize,
    cells: Vec<f64>,
}

impl AgentMatrix {
    pub(crate) fn zeros(agents: Vec<String>, width: usize) -> Self {
        let cells = vec![0.0; agents.len() * width];
        Self {
            agents,
            width,
            cells,
        }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row * self.width + col] = value;
    }

    pub(crate) fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    pub(crate) fn column_sum(&self, col: usize) -> f64 {
        (0..self.agents.len()).map(|r| self.row(r)[col]).sum()
    }

    /// 逐行变换生成新矩阵（不修改原矩阵）
    ///
    /// 变换函数必须返回与原行等宽的新行
    pub(crate) fn map_rows<F>(&self, mut f: F) -> AgentMatrix
    where
        F: FnMut(&str, &[f64]) -> Vec<f64>,
    {
        let mut cells = Vec::with_capacity(self.cells.len());
        for (idx, agent) in self.agents.iter().enumerate() {
            let new_row = f(agent, self.row(idx));
            debug_assert_eq!(new_row.len(), self.width);
            cells.extend(new_row);
        }

        AgentMatrix {
            agents: self.agents.clone(),
            width: self.width,
            cells,
        }
    }

    pub(crate) fn into_rows(self) -> Vec<(String, Vec<f64>)> {
        let AgentMatrix {
            agents,
            width,
            cells,
        } = self;
        agents
            .into_iter()
            .enumerate()
            .map(|(idx, agent)| (agent, cells[idx * width..(idx + 1) * width].to_vec()))
            .collect()
    }
}

/// 负责人全集（跨所有商品列的并集，按首次出现顺序）
pub(crate) fn collect_agents(columns: &[&RateColumn]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut agents = Vec::new();

    for column in columns {
        for (agent, _) in &column.entries {
            if seen.insert(agent.as_str()) {
                agents.push(agent.clone());
            }
        }
    }

    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate::RateCell;

    #[test]
    fn test_collect_agents_is_outer_union() {
        let mut a = RateColumn::new("A");
        a.push("X", RateCell::Value(1.0));
        a.push("Y", RateCell::Value(2.0));
        let mut b = RateColumn::new("B");
        b.push("Z", RateCell::Value(1.0));
        b.push("X", RateCell::Missing);

        let agents = collect_agents(&[&a, &b]);
        assert_eq!(agents, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_map_rows_leaves_source_untouched() {
        let mut m = AgentMatrix::zeros(vec!["X".to_string(), "Y".to_string()], 2);
        m.set(0, 0, 1.0);
        m.set(1, 1, 2.0);

        let doubled = m.map_rows(|_, row| row.iter().map(|v| v * 2.0).collect());

        assert_eq!(m.row(0), &[1.0, 0.0]);
        assert_eq!(doubled.row(0), &[2.0, 0.0]);
        assert_eq!(doubled.row(1), &[0.0, 4.0]);
        assert_eq!(doubled.column_sum(1), 4.0);
    }

    #[test]
    fn test_into_rows() {
        let mut m = AgentMatrix::zeros(vec!["X".to_string(), "Y".to_string()], 2);
        m.set(1, 0, 3.0);
        let rows = m.into_rows();
        assert_eq!(rows[1], ("Y".to_string(), vec![3.0, 0.0]));
    }
}
