// ==========================================
// DB 自动分配器 - 配置层
// ==========================================
// 职责: 分配参数加载、命令行覆写、校验
// 存储: JSON 配置文件（可选）
// ==========================================

pub mod allocation_config;
pub mod error;

// 重导出核心配置
pub use allocation_config::{config_keys, AllocationConfig, ColumnLayout, ConfigOverrides};
pub use error::{ConfigError, ConfigResult};
