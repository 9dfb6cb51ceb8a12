use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 单元格原始值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// 去掉首尾空白后的文本, 空串视为缺失
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(n) => n.to_string(),
            // 整数值的浮点不带小数部分 (900101.0 -> "900101")
            CellValue::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Float(n) => n.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

/// 名册原始行: 列名(或占位键) -> 值, 顺序即位置语义
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: IndexMap<String, CellValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(key.into(), value.into());
    }

    /// 按列名取非空文本
    pub fn text_by_key(&self, key: &str) -> Option<String> {
        self.cells.get(key).and_then(CellValue::as_text)
    }

    /// 按位置取非空文本
    pub fn text_at(&self, index: usize) -> Option<String> {
        self.cells.get_index(index).and_then(|(_, v)| v.as_text())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 所有单元格都为空
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }

    /// 仅按位置构造 (无表头时用列号作键)
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut row = Self::new();
        for (idx, value) in values.into_iter().enumerate() {
            row.push(format!("_col{}", idx), value);
        }
        row
    }
}

impl FromIterator<(String, CellValue)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
