use super::registry::{Flag, HouseholdType, OwnershipType, RegistrationPurpose, ResidenceType};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// 输出列顺序 (固定契约)
pub const OUTPUT_COLUMNS: [&str; 18] = [
    "소유자명",
    "생년월일",
    "동호수",
    "소유자_주소",
    "아파트_소재지",
    "도로명주소",
    "건축물_연면적",
    "거주형태",
    "등기목적_분류",
    "등기원인_년월일",
    "근저당설정여부",
    "근저당금액",
    "보유기간",
    "압류가압류",
    "소유형태",
    "세대유형",
    "공유자수",
    "단독소유자수",
];

/// 每户一条的规范化输出记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalHouseholdRecord {
    #[serde(rename = "소유자명")]
    pub owner_name: Option<String>,
    #[serde(rename = "생년월일")]
    pub birth_date: Option<String>,
    #[serde(rename = "동호수")]
    pub unit_id: Option<String>,
    #[serde(rename = "소유자_주소")]
    pub owner_address: Option<String>,
    #[serde(rename = "아파트_소재지")]
    pub property_address: Option<String>,
    #[serde(rename = "도로명주소")]
    pub road_address: Option<String>,
    #[serde(rename = "건축물_연면적", serialize_with = "plain_number")]
    pub building_area: Option<f64>,
    #[serde(rename = "거주형태")]
    pub residence_type: ResidenceType,
    #[serde(rename = "등기목적_분류")]
    pub registration_purpose: RegistrationPurpose,
    #[serde(rename = "등기원인_년월일")]
    pub registration_cause_date: Option<String>,
    #[serde(rename = "근저당설정여부")]
    pub mortgage_flag: Flag,
    #[serde(
        rename = "근저당금액",
        serialize_with = "plain_decimal",
        deserialize_with = "decimal_from_text"
    )]
    pub mortgage_amount: Option<BigDecimal>,
    #[serde(rename = "보유기간")]
    pub holding_period: Option<String>,
    #[serde(rename = "압류가압류")]
    pub seizure_types: String,
    #[serde(rename = "소유형태")]
    pub ownership_type: OwnershipType,
    #[serde(rename = "세대유형")]
    pub household_type: HouseholdType,
    #[serde(rename = "공유자수")]
    pub co_owner_count: u32,
    #[serde(rename = "단독소유자수")]
    pub sole_owner_count: u32,
}

/// 整数值不输出小数点 (80000000 而不是 80000000.0)
fn plain_number<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => serializer.serialize_i64(*n as i64),
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_none(),
    }
}

/// 金额原样输出: 整数不带小数点, 超出 i64 时按文本写出
fn plain_decimal<S: Serializer>(
    value: &Option<BigDecimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let Some(n) = value else {
        return serializer.serialize_none();
    };

    let text = if n.is_integer() {
        n.with_scale(0).to_string()
    } else {
        n.to_string()
    };
    match text.parse::<i64>() {
        Ok(int) => serializer.serialize_i64(int),
        Err(_) => serializer.serialize_str(&text),
    }
}

fn decimal_from_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BigDecimal>, D::Error> {
    let text: Option<String> = Option::deserialize(deserializer)?;
    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) => BigDecimal::from_str(t)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
