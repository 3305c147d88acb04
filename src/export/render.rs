// ==========================================
// DB 自动分配器 - 终端表格展示
// ==========================================

use crate::domain::allocation::{AllocationTable, AGENT_HEADER, TOTAL_HEADER};

/// 渲染为对齐的纯文本表格（按字符数对齐）
pub fn render_text(table: &AllocationTable) -> String {
    let mut lines: Vec<Vec<String>> = Vec::with_capacity(table.agent_count() + 2);

    let mut header = vec![AGENT_HEADER.to_string()];
    header.extend(table.products().iter().cloned());
    header.push(TOTAL_HEADER.to_string());
    lines.push(header);

    for record in table.records() {
        let mut line = vec![record.label.to_string()];
        line.extend(record.quantities.iter().map(|q| format!("{:.1}", q)));
        line.push(record.total.to_string());
        lines.push(line);
    }

    let columns = lines[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            lines
                .iter()
                .map(|l| l[c].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for line in &lines {
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                let pad = widths[c] - cell.chars().count();
                if c == 0 {
                    format!("{}{}", cell, " ".repeat(pad))
                } else {
                    format!("{}{}", " ".repeat(pad), cell)
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out
}
