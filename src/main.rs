// ==========================================
// DB 自动分配器 - 命令行入口
// ==========================================
// 用法:
//   db-distributor <订单率文件.xlsx|.csv> [--cap 12] [--batch-label 1차]
//                  [--quantity "삼성 혈당=120"]... [--format xlsx|csv|json|all]
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use db_distributor::api::AllocationApi;
use db_distributor::config::{AllocationConfig, ConfigOverrides};
use db_distributor::export::{render_text, ExportFormat};
use db_distributor::logging;
use std::path::PathBuf;

/// DB 自动分配器 - 按订单率比例分配商品数量
#[derive(Parser, Debug)]
#[command(name = "db-distributor")]
#[command(about = "按负责人订单率比例分配商品数量，并限制每人合计上限")]
#[command(version)]
struct Args {
    /// 订单率文件（.xlsx / .xls / .csv）
    input: PathBuf,

    /// JSON 配置文件（默认: <config_dir>/db-distributor/config.json）
    #[arg(long, env = "DB_DISTRIBUTOR_CONFIG")]
    config: Option<PathBuf>,

    /// 每人最大分配数量（全部商品合计）
    #[arg(long, env = "DB_DISTRIBUTOR_CAP")]
    cap: Option<String>,

    /// 回次名（仅用于导出文件名）
    #[arg(long)]
    batch_label: Option<String>,

    /// 商品总数量，格式 "商品名=数量"，可重复
    #[arg(long = "quantity", value_name = "NAME=QTY")]
    quantities: Vec<String>,

    /// 输出目录
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// 导出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Xlsx)]
    format: OutputFormat,

    /// 只显示结果，不写文件
    #[arg(long)]
    no_export: bool,

    /// 以 JSON 行输出日志
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xlsx,
    Csv,
    Json,
    All,
}

impl OutputFormat {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            OutputFormat::Xlsx => vec![ExportFormat::Xlsx],
            OutputFormat::Csv => vec![ExportFormat::Csv],
            OutputFormat::Json => vec![ExportFormat::Json],
            OutputFormat::All => vec![ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Json],
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_json);

    tracing::info!("{} v{}", db_distributor::APP_NAME, db_distributor::VERSION);

    let mut config = AllocationConfig::load_or_default(args.config.as_deref())
        .context("加载配置失败")?;
    config
        .apply_overrides(&ConfigOverrides {
            cap: args.cap.clone(),
            batch_label: args.batch_label.clone(),
            quantities: args.quantities.clone(),
            output_dir: args.output_dir.clone(),
        })
        .context("命令行参数无效")?;

    let api = AllocationApi::new(config).context("配置校验失败")?;
    let report = api
        .run_file(&args.input)
        .with_context(|| format!("分配失败: {}", args.input.display()))?;

    for violation in report.dq_report.warnings() {
        eprintln!(
            "[警告] 第 {} 行 {}: {}",
            violation.row_number, violation.field, violation.message
        );
    }

    print!("{}", render_text(&report.table));

    if !args.no_export {
        for format in args.format.formats() {
            let path = api.export(&report, format).context("导出失败")?;
            println!("结果文件已保存: {}", path.display());
        }
    }

    Ok(())
}
