// ==========================================
// DB 自动分配器 - 分配配置
// ==========================================
// 职责: 人均上限 / 回次名 / 商品总数量 / 列布局 / 输出目录
// 来源: 内置默认值 → JSON 配置文件 → 命令行覆写
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::product::{product_names, Product};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ==========================================
// 配置键（用于错误定位）
// ==========================================
pub mod config_keys {
    pub const CAP: &str = "cap";
    pub const BATCH_LABEL: &str = "batch_label";
    pub const PRODUCTS: &str = "products";
    pub const QUANTITY: &str = "quantity";
    pub const LAYOUT: &str = "layout";
}

/// 默认人均上限（全部商品合计）
pub const DEFAULT_CAP: f64 = 12.0;
/// 默认回次名
pub const DEFAULT_BATCH_LABEL: &str = "1차";
/// 默认输出目录
pub const DEFAULT_OUTPUT_DIR: &str = "간편_비율_분배결과";
/// 默认商品（顺序即订单率文件中的列顺序）
pub const DEFAULT_PRODUCTS: &[&str] = &["삼성 혈당", "삼성 쾌변", "삼성 메가", "원광 침향", "일양 뼈"];
/// 默认商品总数量
pub const DEFAULT_PRODUCT_QUANTITY: f64 = 100.0;

// ==========================================
// ColumnLayout - 订单率文件列布局
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// 负责人列（0 起始）
    pub agent_column: usize,
    /// 第一个商品列（0 起始），其余商品依次向右
    pub first_product_column: usize,
    /// 表头包含全部商品名时按表头匹配，否则按位置
    pub match_headers: bool,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            agent_column: 1,
            first_product_column: 2,
            match_headers: true,
        }
    }
}

// ==========================================
// AllocationConfig - 分配配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub cap: f64,
    pub batch_label: String,
    pub products: Vec<Product>,
    pub layout: ColumnLayout,
    pub output_dir: PathBuf,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            cap: DEFAULT_CAP,
            batch_label: DEFAULT_BATCH_LABEL.to_string(),
            products: DEFAULT_PRODUCTS
                .iter()
                .map(|name| Product::new(*name, DEFAULT_PRODUCT_QUANTITY))
                .collect(),
            layout: ColumnLayout::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

// ==========================================
// ConfigOverrides - 命令行覆写（原始字符串，统一在此解析）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cap: Option<String>,
    pub batch_label: Option<String>,
    /// 形如 "商品名=数量"
    pub quantities: Vec<String>,
    pub output_dir: Option<PathBuf>,
}

impl AllocationConfig {
    /// 默认配置文件路径: <config_dir>/db-distributor/config.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("db-distributor").join("config.json"))
    }

    /// 从 JSON 文件加载（缺省字段取默认值）
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: AllocationConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        info!(path = %path.display(), products = config.products.len(), "配置文件已加载");
        Ok(config)
    }

    /// 加载配置
    ///
    /// 显式路径优先；否则默认路径存在时加载；都没有时使用内置默认值
    pub fn load_or_default(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                debug!("未找到配置文件，使用内置默认配置");
                Ok(Self::default())
            }
        }
    }

    /// 应用命令行覆写
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> ConfigResult<()> {
        if let Some(raw) = &overrides.cap {
            self.cap = parse_number(config_keys::CAP, raw)?;
        }

        if let Some(label) = &overrides.batch_label {
            self.batch_label = label.trim().to_string();
        }

        for entry in &overrides.quantities {
            let (name, raw_qty) = entry.rsplit_once('=').ok_or_else(|| {
                ConfigError::invalid(config_keys::QUANTITY, entry, "期望格式: 商品名=数量")
            })?;
            let name = name.trim();
            let key = format!("{}.{}", config_keys::QUANTITY, name);
            let quantity = parse_number(&key, raw_qty)?;

            let product = self
                .products
                .iter_mut()
                .find(|p| p.name == name)
                .ok_or_else(|| ConfigError::invalid(&key, entry, "未知商品"))?;
            product.total_quantity = quantity;
        }

        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }

        Ok(())
    }

    /// 校验配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.cap.is_finite() || self.cap <= 0.0 {
            return Err(ConfigError::invalid(
                config_keys::CAP,
                self.cap,
                "人均上限必须为大于 0 的数值",
            ));
        }

        if self.batch_label.trim().is_empty() {
            return Err(ConfigError::invalid(
                config_keys::BATCH_LABEL,
                &self.batch_label,
                "回次名不能为空",
            ));
        }

        if self.products.is_empty() {
            return Err(ConfigError::invalid(
                config_keys::PRODUCTS,
                "[]",
                "商品集合不能为空",
            ));
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            let key = format!("{}.{}", config_keys::PRODUCTS, product.name);
            if product.name.trim().is_empty() {
                return Err(ConfigError::invalid(&key, &product.name, "商品名称不能为空"));
            }
            if !seen.insert(product.name.as_str()) {
                return Err(ConfigError::invalid(&key, &product.name, "商品名称重复"));
            }
            if !product.total_quantity.is_finite() || product.total_quantity < 0.0 {
                return Err(ConfigError::invalid(
                    &key,
                    product.total_quantity,
                    "商品总数量必须为 >= 0 的数值",
                ));
            }
        }

        if self.layout.first_product_column == self.layout.agent_column {
            return Err(ConfigError::invalid(
                config_keys::LAYOUT,
                self.layout.first_product_column,
                "商品列不能与负责人列重叠",
            ));
        }

        Ok(())
    }

    pub fn product_names(&self) -> Vec<String> {
        product_names(&self.products)
    }
}

/// 解析数值配置项，失败时带上键与原始值
fn parse_number(key: &str, raw: &str) -> ConfigResult<f64> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ConfigError::invalid(key, trimmed, "无法解析为数值"))?;
    if !value.is_finite() {
        return Err(ConfigError::invalid(key, trimmed, "必须为有限数值"));
    }
    Ok(value)
}
