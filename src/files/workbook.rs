use crate::config::SheetConfig;
use crate::error::{NormalizeError, Result};
use crate::models::{CellValue, RawRow};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 读取 구분소유자명부 工作表
///
/// 先跳过 `skip_rows` 行, 下一行作为表头, 其余为数据行. 全空行直接丢弃.
pub fn load_registry_rows(path: &Path, sheet: &SheetConfig) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)?;

    if !workbook.sheet_names().iter().any(|name| name == &sheet.name) {
        return Err(NormalizeError::SheetNotFound {
            sheet: sheet.name.clone(),
            path: path.to_path_buf(),
        });
    }

    let range = workbook.worksheet_range(&sheet.name)?;
    let grid = absolute_grid(&range);

    let rows = rows_from_grid(grid, sheet.skip_rows);
    tracing::info!(
        "loaded {} rows from '{}' ({})",
        rows.len(),
        sheet.name,
        path.display()
    );
    Ok(rows)
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Float(*n),
        Data::Int(n) => CellValue::Int(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Range 只覆盖已用区域, 补齐前导空行空列, 使行列号与工作表一致
fn absolute_grid(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let leading = (0..start_row).map(|_| Vec::<CellValue>::new());
    let used = range.rows().map(|row| {
        std::iter::repeat(CellValue::Empty)
            .take(start_col as usize)
            .chain(row.iter().map(to_cell))
            .collect::<Vec<CellValue>>()
    });
    leading.chain(used).collect()
}

/// 表头转列键: 空表头用 __EMPTY, __EMPTY_1 ..., 重复表头追加 _1, _2 ...
///
/// 生成的键与已有键冲突时继续递增后缀, 保证每列一个键.
pub fn header_keys(header: &[CellValue]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();

    header
        .iter()
        .map(|cell| {
            let base = cell.as_text().unwrap_or_else(|| "__EMPTY".to_string());
            let mut key = base.clone();
            while used.contains(&key) {
                let n = suffixes.entry(base.clone()).or_insert(0);
                *n += 1;
                key = format!("{}_{}", base, n);
            }
            used.insert(key.clone());
            key
        })
        .collect()
}

/// 网格 -> 带表头键的原始行
pub fn rows_from_grid(grid: Vec<Vec<CellValue>>, skip_rows: usize) -> Vec<RawRow> {
    let mut iter = grid.into_iter().skip(skip_rows);
    let Some(mut header) = iter.next() else {
        return Vec::new();
    };
    let data: Vec<Vec<CellValue>> = iter.collect();

    // 数据行比表头宽时, 多出的列也按空表头命名
    let width = data.iter().map(Vec::len).max().unwrap_or(0).max(header.len());
    header.resize(width, CellValue::Empty);
    let keys = header_keys(&header);

    data.into_iter()
        .map(|cells| {
            let mut values = cells.into_iter();
            keys.iter()
                .map(|key| (key.clone(), values.next().unwrap_or_default()))
                .collect::<RawRow>()
        })
        .filter(|row| !row.is_blank())
        .collect()
}
