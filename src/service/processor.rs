use crate::config::AppConfig;
use crate::error::Result;
use crate::files::{self, output};
use crate::service::pipeline::{NormalizeOutcome, PipelineStats, RegistryPipeline};
use chrono::Utc;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 单个文件的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    /// 空表时不生成输出
    pub output: Option<PathBuf>,
    pub records: usize,
    pub stats: PipelineStats,
}

impl FileReport {
    pub fn is_empty(&self) -> bool {
        self.output.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub input: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub input: PathBuf,
    pub fresh_output: PathBuf,
}

/// 批处理汇总
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub processed: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFile>,
}

/// 名册文件处理服务: 读取 -> 规范化 -> 写出 CSV
pub struct FileProcessor {
    config: AppConfig,
    pipeline: RegistryPipeline,
}

impl FileProcessor {
    pub fn new(config: AppConfig) -> Self {
        let pipeline = RegistryPipeline::new(&config);
        Self { config, pipeline }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 只规范化, 不写文件
    pub fn normalize_file(&self, path: &Path) -> Result<NormalizeOutcome> {
        let rows = files::load_registry_rows(path, &self.config.sheet)?;
        Ok(self.pipeline.normalize(rows))
    }

    pub fn process_file(&self, path: &Path) -> Result<FileReport> {
        tracing::info!("파일 전처리 시작: {}", path.display());

        let outcome = self.normalize_file(path)?;
        if outcome.stats.input_rows == 0 {
            tracing::warn!("빈 파일입니다: {}", path.display());
            return Ok(FileReport {
                input: path.to_path_buf(),
                output: None,
                records: 0,
                stats: outcome.stats,
            });
        }

        fs::create_dir_all(&self.config.paths.output_dir)?;
        let output_path = self
            .config
            .paths
            .output_dir
            .join(output::output_file_name(path, Utc::now()));
        files::write_records(&output_path, &outcome.records)?;

        Ok(FileReport {
            input: path.to_path_buf(),
            output: Some(output_path),
            records: outcome.records.len(),
            stats: outcome.stats,
        })
    }

    /// 输入目录下的 Excel 文件 (按文件名排序)
    pub fn list_inputs(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.paths.input_dir;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut inputs: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_workbook(p))
            .collect();
        inputs.sort();
        Ok(inputs)
    }

    /// 批量处理输入目录; 每个文件独立, 可并行
    pub fn process_dir(&self, force: bool) -> Result<BatchReport> {
        let inputs = self.list_inputs()?;
        tracing::info!("Excel 파일 {}개 발견", inputs.len());

        let mut report = BatchReport::default();
        let mut pending = Vec::with_capacity(inputs.len());

        // 1. 跳过已是最新的文件
        for input in inputs {
            if !force {
                if let Some(fresh) = output::is_up_to_date(&input, &self.config.paths.output_dir)? {
                    tracing::info!(
                        "이미 처리된 파일, 건너뜀: {} -> {}",
                        input.display(),
                        fresh.display()
                    );
                    report.skipped.push(SkippedFile {
                        input,
                        fresh_output: fresh,
                    });
                    continue;
                }
            }
            pending.push(input);
        }

        // 2. 并行处理, 文件之间不共享可变状态
        let results: Vec<(PathBuf, Result<FileReport>)> = match self.config.workers {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
                pool.install(|| self.run_all(&pending))
            }
            None => self.run_all(&pending),
        };

        for (input, result) in results {
            match result {
                Ok(file_report) => {
                    tracing::info!(
                        "처리 완료: {} -> {}건",
                        input.display(),
                        file_report.records
                    );
                    report.processed.push(file_report);
                }
                Err(e) => {
                    tracing::error!("파일 처리 실패: {}: {}", input.display(), e);
                    report.failed.push(FailedFile {
                        input,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "batch finished: processed {}, skipped {}, failed {}",
            report.processed.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn run_all(&self, inputs: &[PathBuf]) -> Vec<(PathBuf, Result<FileReport>)> {
        inputs
            .par_iter()
            .map(|input| (input.clone(), self.process_file(input)))
            .collect()
    }
}

fn is_workbook(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map_or(true, |n| n.to_string_lossy().starts_with('.'));
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    !hidden && (ext == "xlsx" || ext == "xls")
}
