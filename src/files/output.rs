use crate::error::Result;
use crate::models::CanonicalHouseholdRecord;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const BOM: &str = "\u{FEFF}";
const OUTPUT_MARKER: &str = "_전처리_";

/// 输出文件名: {원본}_전처리_{UTC 时间戳}.csv
pub fn output_file_name(input: &Path, processed_at: DateTime<Utc>) -> String {
    let base = base_name(input);
    format!(
        "{}{}{}.csv",
        base,
        OUTPUT_MARKER,
        processed_at.format("%Y-%m-%dT%H-%M-%S-%3fZ")
    )
}

pub fn base_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 记录序列化为带 BOM 的 CSV 字节
pub fn to_csv_bytes(records: &[CanonicalHouseholdRecord]) -> Result<Vec<u8>> {
    let mut buffer = BOM.as_bytes().to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        if records.is_empty() {
            writer.write_record(crate::models::OUTPUT_COLUMNS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

/// 原子写入: 先写临时文件, 再 rename 覆盖目标
pub fn write_records(path: &Path, records: &[CanonicalHouseholdRecord]) -> Result<()> {
    let bytes = to_csv_bytes(records)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    tracing::info!("CSV 저장 완료: {} ({}건)", path.display(), records.len());
    Ok(())
}

/// 解析 CSV 文本 (容忍开头的 BOM)
pub fn parse_records(content: &str) -> Result<Vec<CanonicalHouseholdRecord>> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

pub fn read_records(path: &Path) -> Result<Vec<CanonicalHouseholdRecord>> {
    let content = fs::read_to_string(path)?;
    parse_records(&content)
}

/// 查找同名输入最近一次的输出文件 (按修改时间)
pub fn latest_output(base: &str, output_dir: &Path) -> Result<Option<(PathBuf, SystemTime)>> {
    if !output_dir.exists() {
        return Ok(None);
    }

    let prefix = format!("{}{}", base, OUTPUT_MARKER);
    let mut latest: Option<(PathBuf, SystemTime)> = None;

    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(&prefix) || !name.ends_with(".csv") {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        let is_newer = latest.as_ref().map_or(true, |(_, t)| modified > *t);
        if is_newer {
            latest = Some((entry.path(), modified));
        }
    }

    Ok(latest)
}

/// 输出比输入新时无需重新处理
pub fn is_up_to_date(input: &Path, output_dir: &Path) -> Result<Option<PathBuf>> {
    let input_modified = fs::metadata(input)?.modified()?;
    Ok(latest_output(&base_name(input), output_dir)?
        .filter(|(_, modified)| *modified > input_modified)
        .map(|(path, _)| path))
}
