use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 居住形态 (거주형태)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidenceType {
    #[serde(rename = "실거주")]
    Resident,
    #[serde(rename = "투자")]
    Investor,
    #[serde(rename = "실거주(추정)")]
    ResidentEstimated,
    #[serde(rename = "정보없음")]
    NoInformation,
}

impl ResidenceType {
    pub fn label(&self) -> &'static str {
        match self {
            ResidenceType::Resident => "실거주",
            ResidenceType::Investor => "투자",
            ResidenceType::ResidentEstimated => "실거주(추정)",
            ResidenceType::NoInformation => "정보없음",
        }
    }
}

/// 登记目的分类 (등기목적)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationPurpose {
    #[serde(rename = "매매")]
    Sale,
    #[serde(rename = "증여")]
    Gift,
    #[serde(rename = "상속")]
    Inheritance,
    #[serde(rename = "경매")]
    Auction,
    #[serde(rename = "기타")]
    Other,
}

/// Y/N 标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flag {
    Y,
    N,
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        if b {
            Flag::Y
        } else {
            Flag::N
        }
    }
}

/// 所有形态 (소유형태)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnershipType {
    #[serde(rename = "단독소유자")]
    SoleOwner,
    #[serde(rename = "공유자")]
    CoOwner,
}

/// 户型 (세대유형)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HouseholdType {
    #[serde(rename = "단독세대")]
    Sole,
    #[serde(rename = "공유세대")]
    Shared,
}

/// 逐行富化后的名册行 (一次运行内不可变)
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    /// 原始行号 (0-based, 仅用于诊断)
    pub row_index: usize,
    pub sequence_text: Option<String>,
    pub sequence_number: Option<i64>,
    pub co_ownership_marker: Option<String>,
    pub owner_name: Option<String>,
    pub birth_date: Option<String>,
    pub dong: Option<String>,
    pub ho: Option<String>,
    pub unit_id: Option<String>,
    pub owner_address: Option<String>,
    pub property_address: Option<String>,
    pub road_address: Option<String>,
    pub building_area: Option<f64>,
    pub registration_purpose: RegistrationPurpose,
    pub registration_cause_date: Option<String>,
    pub mortgage_flag: Flag,
    pub mortgage_amount: Option<BigDecimal>,
    pub holding_period: Option<String>,
    pub seizure_types: String,
    pub seizure_flag: Flag,
    pub ownership_type: OwnershipType,
    pub residence_type: ResidenceType,
}

impl EnrichedRow {
    /// 是否带有任何可用于分组的信号
    pub fn has_signal(&self) -> bool {
        self.sequence_text.is_some()
            || self.owner_name.is_some()
            || self.unit_id.is_some()
            || self.dong.is_some()
            || self.ho.is_some()
    }

    pub fn is_shared_marker(&self) -> bool {
        self.co_ownership_marker.as_deref() == Some("-")
    }
}
