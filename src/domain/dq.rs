// ==========================================
// DB 自动分配器 - 数据质量记录
// ==========================================
// 职责: 订单率导入阶段的非致命问题（不阻断分配）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Warning, // 警告（已按无数据处理）
    Info,    // 提示（仅记录）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,     // 原始文件行号（表头为第 1 行）
    pub agent: Option<String>, // 负责人（如果可解析）
    pub level: DqLevel,
    pub field: String,   // 列名
    pub message: String, // 违规描述（含原始值）
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 读取的数据行数
    pub agent_rows: usize, // 进入订单率表的负责人数
    pub warning: usize,
    pub info: usize,
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn push(&mut self, violation: DqViolation) {
        match violation.level {
            DqLevel::Warning => self.summary.warning += 1,
            DqLevel::Info => self.summary.info += 1,
        }
        self.violations.push(violation);
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DqViolation> {
        self.violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.summary.warning > 0
    }
}
