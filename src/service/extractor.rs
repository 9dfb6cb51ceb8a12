use crate::models::{RawRow, RegistrationPurpose};
use serde::{Deserialize, Serialize};

/// 名册中的逻辑字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sequence,
    CoOwnershipMarker,
    PropertyAddress,
    RoadAddress,
    Dong,
    Ho,
    BuildingArea,
    OwnershipDivision,
    OwnerName,
    BirthToken,
    OwnerAddress,
    RegistrationPurpose,
    RegistrationCause,
    LienType,
    LienContent,
    HoldingPeriod,
}

/// 单个字段的探测顺序: 表头同义词 -> 占位键 -> 列位置 -> 表头关键字
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FieldSpec {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub placeholders: Vec<String>,
    #[serde(default)]
    pub index: Option<usize>,
    /// 表头名包含这些关键字也算命中 (最后手段)
    #[serde(default)]
    pub header_keywords: Vec<String>,
}

impl FieldSpec {
    fn at(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    fn with_headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|h| h.to_string()).collect();
        self
    }

    fn with_placeholders(mut self, keys: &[&str]) -> Self {
        self.placeholders = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.header_keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }
}

/// 列结构描述 (位置偏移作为配置数据)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub sequence: FieldSpec,
    pub co_ownership_marker: FieldSpec,
    pub property_address: FieldSpec,
    pub road_address: FieldSpec,
    pub dong: FieldSpec,
    pub ho: FieldSpec,
    pub building_area: FieldSpec,
    pub ownership_division: FieldSpec,
    pub owner_name: FieldSpec,
    pub birth_token: FieldSpec,
    pub owner_address: FieldSpec,
    pub registration_purpose: FieldSpec,
    pub registration_cause: FieldSpec,
    pub lien_type: FieldSpec,
    pub lien_content: FieldSpec,
    pub holding_period: FieldSpec,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            sequence: FieldSpec::at(0)
                .with_headers(&["연번"])
                .with_placeholders(&["__EMPTY", "A"]),
            co_ownership_marker: FieldSpec::at(1),
            property_address: FieldSpec::at(5),
            road_address: FieldSpec::at(6),
            dong: FieldSpec::at(8).with_headers(&["동"]).with_placeholders(&["I"]),
            ho: FieldSpec::at(11).with_headers(&["호수"]).with_placeholders(&["L"]),
            building_area: FieldSpec::at(19),
            ownership_division: FieldSpec::at(22),
            owner_name: FieldSpec::at(23)
                .with_headers(&["소유자명", "성명", "소유자", "성명(소유자)"])
                .with_placeholders(&["X"])
                .with_keywords(&["성명", "소유자", "이름"]),
            birth_token: FieldSpec::at(24),
            owner_address: FieldSpec::at(25),
            registration_purpose: FieldSpec::at(27),
            registration_cause: FieldSpec::at(31),
            lien_type: FieldSpec::at(37),
            lien_content: FieldSpec::at(38),
            holding_period: FieldSpec::at(45),
        }
    }
}

impl ColumnSchema {
    pub fn field_spec(&self, field: Field) -> &FieldSpec {
        match field {
            Field::Sequence => &self.sequence,
            Field::CoOwnershipMarker => &self.co_ownership_marker,
            Field::PropertyAddress => &self.property_address,
            Field::RoadAddress => &self.road_address,
            Field::Dong => &self.dong,
            Field::Ho => &self.ho,
            Field::BuildingArea => &self.building_area,
            Field::OwnershipDivision => &self.ownership_division,
            Field::OwnerName => &self.owner_name,
            Field::BirthToken => &self.birth_token,
            Field::OwnerAddress => &self.owner_address,
            Field::RegistrationPurpose => &self.registration_purpose,
            Field::RegistrationCause => &self.registration_cause,
            Field::LienType => &self.lien_type,
            Field::LienContent => &self.lien_content,
            Field::HoldingPeriod => &self.holding_period,
        }
    }
}

/// 按列结构描述从原始行取字段, 缺失返回 None 而不是错误
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    schema: ColumnSchema,
}

impl FieldExtractor {
    pub fn new(schema: ColumnSchema) -> Self {
        Self { schema }
    }

    pub fn get(&self, row: &RawRow, field: Field) -> Option<String> {
        let lookup = self.schema.field_spec(field);

        lookup
            .headers
            .iter()
            .chain(lookup.placeholders.iter())
            .find_map(|key| row.text_by_key(key))
            .or_else(|| lookup.index.and_then(|idx| row.text_at(idx)))
            .or_else(|| {
                if lookup.header_keywords.is_empty() {
                    return None;
                }
                row.keys()
                    .filter(|key| {
                        lookup
                            .header_keywords
                            .iter()
                            .any(|kw| key.contains(kw.as_str()))
                    })
                    .find_map(|key| row.text_by_key(key))
            })
    }

    /// 동, 호수 与组合后的 동호수
    pub fn unit_info(&self, row: &RawRow) -> (Option<String>, Option<String>, Option<String>) {
        let dong = self.get(row, Field::Dong);
        let ho = self.get(row, Field::Ho).map(|ho| {
            if ho.ends_with('호') {
                ho
            } else {
                format!("{}호", ho)
            }
        });

        let unit_id = format!(
            "{} {}",
            dong.as_deref().unwrap_or(""),
            ho.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();

        let unit_id = if unit_id.is_empty() { None } else { Some(unit_id) };
        (dong, ho, unit_id)
    }

    /// 건축물 연면적: 只保留数字和小数点后解析
    pub fn building_area(&self, row: &RawRow) -> Option<f64> {
        let raw = self.get(row, Field::BuildingArea)?;
        let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
        cleaned.parse::<f64>().ok()
    }
}

/// 등기목적 + 등기원인 文本分类
pub fn classify_purpose(purpose: Option<&str>, cause: Option<&str>) -> RegistrationPurpose {
    let combined = format!("{} {}", purpose.unwrap_or(""), cause.unwrap_or(""));

    if combined.contains("매매") {
        RegistrationPurpose::Sale
    } else if combined.contains("증여") {
        RegistrationPurpose::Gift
    } else if combined.contains("상속") {
        RegistrationPurpose::Inheritance
    } else if combined.contains("경락") || combined.contains("경매") {
        RegistrationPurpose::Auction
    } else {
        RegistrationPurpose::Other
    }
}

/// 连番: 取开头的整数部分 ("12", "12.0", "12번" -> 12)
pub fn parse_sequence(text: &str) -> Option<i64> {
    let text = text.trim();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
