use crate::error::Result;
use crate::service::extractor::ColumnSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub sheet: SheetConfig,
    pub residence: ResidenceConfig,
    pub schema: ColumnSchema,
    /// 批处理并行度, 未设置时使用 rayon 默认值
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    pub name: String,
    /// 表头之前需要跳过的行数
    pub skip_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidenceConfig {
    /// 匹配分数 >= threshold 即判定为实际居住
    pub threshold: f64,
    pub scoring: ScoringVariant,
}

/// 地址匹配评分公式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoringVariant {
    /// 시/도 + 구 + 동 三段式
    #[default]
    Canonical,
    /// 三段式 + 建筑名/地番 + 全串 Levenshtein 相似度
    Detailed,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                input_dir: PathBuf::from("input-data"),
                output_dir: PathBuf::from("processed-data"),
            },
            sheet: SheetConfig {
                name: "구분소유자명부".to_string(),
                skip_rows: 3,
            },
            residence: ResidenceConfig::default(),
            schema: ColumnSchema::default(),
            workers: None,
        }
    }
}

impl Default for ResidenceConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            scoring: ScoringVariant::Canonical,
        }
    }
}

impl AppConfig {
    /// 分层加载: 默认值 -> 配置文件 (可选) -> 环境变量 NORMALIZER__*
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        builder = match path {
            Some(p) => builder.add_source(config::File::from(p)),
            None => builder.add_source(config::File::with_name("normalizer").required(false)),
        };

        let settings = builder
            .add_source(
                config::Environment::with_prefix("NORMALIZER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
