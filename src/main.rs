use clap::{Parser, Subcommand};
use registry_normalizer::files;
use registry_normalizer::models::{CanonicalHouseholdRecord, HouseholdType};
use registry_normalizer::{AppConfig, FileProcessor};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

/// 구분소유자명부 전처리 工具
#[derive(Parser, Debug)]
#[command(name = "registry-normalizer", version, about)]
struct Cli {
    /// 配置文件 (TOML), 默认读取当前目录的 normalizer.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 批量处理输入目录中的全部 Excel 文件
    Run {
        /// 即使输出已是最新也重新处理
        #[arg(long)]
        force: bool,
    },
    /// 处理单个文件
    File {
        path: PathBuf,
        /// 不写文件, 直接以 JSON 输出记录
        #[arg(long)]
        json: bool,
    },
    /// 汇总已生成的 CSV
    Inspect { csv: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    // 加载配置
    let config = AppConfig::load(cli.config.as_deref())?;
    info!("Loaded config: {:?}", config.paths);

    match cli.command {
        Command::Run { force } => {
            let processor = FileProcessor::new(config);
            info!(
                "input: {}, output: {}",
                processor.config().paths.input_dir.display(),
                processor.config().paths.output_dir.display()
            );
            let report = processor.process_dir(force)?;
            info!(
                "batch done: processed {}, skipped {}, failed {}",
                report.processed.len(),
                report.skipped.len(),
                report.failed.len()
            );
            if !report.failed.is_empty() {
                return Err(format!("{} file(s) failed", report.failed.len()).into());
            }
        }
        Command::File { path, json } => {
            let processor = FileProcessor::new(config);
            if json {
                let outcome = processor.normalize_file(&path)?;
                println!("{}", serde_json::to_string_pretty(&outcome.records)?);
            } else {
                let report = processor.process_file(&path)?;
                if report.is_empty() {
                    info!("빈 파일, 출력 없음: {}", path.display());
                } else if let Some(output) = &report.output {
                    info!("저장: {} ({}건)", output.display(), report.records);
                }
                println!("{}", serde_json::to_string_pretty(&report.stats)?);
            }
        }
        Command::Inspect { csv } => {
            let records = files::read_records(&csv)?;
            print_summary(&records);
        }
    }

    Ok(())
}

fn print_summary(records: &[CanonicalHouseholdRecord]) {
    let shared = records
        .iter()
        .filter(|r| r.household_type == HouseholdType::Shared)
        .count();

    let mut by_residence: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *by_residence
            .entry(record.residence_type.label().to_string())
            .or_insert(0) += 1;
    }

    println!("총 세대수: {}", records.len());
    println!("  공유세대: {}", shared);
    println!("  단독세대: {}", records.len() - shared);
    println!("거주형태:");
    for (label, count) in &by_residence {
        println!("  {}: {}", label, count);
    }
}
