// ==========================================
// DB 自动分配器 - 导出层
// ==========================================
// 职责: 分配结果表的文件导出与终端展示
// 格式: Excel / CSV / JSON / 纯文本
// ==========================================

pub mod error;
pub mod render;
pub mod writer;

pub use error::{ExportError, ExportResult};
pub use render::render_text;
pub use writer::{export_table, file_name, write_csv, write_json, write_xlsx, ExportFormat};
