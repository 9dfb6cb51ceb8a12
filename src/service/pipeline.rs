use crate::config::AppConfig;
use crate::models::{CanonicalHouseholdRecord, EnrichedRow, Flag, HouseholdType, RawRow};
use crate::service::assembler::assemble_all;
use crate::service::extractor::{classify_purpose, parse_sequence, Field, FieldExtractor};
use crate::service::grouper::group_households;
use crate::service::residence::ResidenceClassifier;
use crate::service::{amounts, dates, ownership};
use serde::Serialize;

/// 行级诊断计数 (歧义只计数, 不报错)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    pub input_rows: usize,
    pub blank_rows: usize,
    pub dropped_rows: usize,
    pub households: usize,
    pub shared_households: usize,
    pub missing_birth_date: usize,
    pub missing_cause_date: usize,
    pub mortgage_without_amount: usize,
    pub missing_address: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub records: Vec<CanonicalHouseholdRecord>,
    pub stats: PipelineStats,
}

/// 名册规范化管线: 原始行 -> 富化 -> 分组 -> 输出记录
#[derive(Debug, Clone)]
pub struct RegistryPipeline {
    extractor: FieldExtractor,
    residence: ResidenceClassifier,
}

impl RegistryPipeline {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            extractor: FieldExtractor::new(config.schema.clone()),
            residence: ResidenceClassifier::new(&config.residence),
        }
    }

    /// 单行富化
    pub fn enrich(&self, row_index: usize, row: &RawRow) -> EnrichedRow {
        let get = |field| self.extractor.get(row, field);

        let sequence_text = get(Field::Sequence);
        let sequence_number = sequence_text.as_deref().and_then(parse_sequence);
        let (dong, ho, unit_id) = self.extractor.unit_info(row);

        let owner_address = get(Field::OwnerAddress);
        let property_address = get(Field::PropertyAddress);

        let purpose_text = get(Field::RegistrationPurpose);
        let cause_text = get(Field::RegistrationCause);

        let lien_type = get(Field::LienType);
        let lien_content = get(Field::LienContent);
        let mortgage = amounts::parse_mortgage(lien_type.as_deref(), lien_content.as_deref());
        let (seizure_types, seizure_flag) =
            ownership::seizure_types(lien_type.as_deref(), lien_content.as_deref());

        let co_ownership_marker = get(Field::CoOwnershipMarker);
        let ownership_type = ownership::classify_ownership(
            get(Field::OwnershipDivision).as_deref(),
            co_ownership_marker.as_deref(),
        );

        let residence_type = self.residence.classify(
            owner_address.as_deref(),
            property_address.as_deref(),
            unit_id.as_deref(),
        );

        EnrichedRow {
            row_index,
            sequence_text,
            sequence_number,
            co_ownership_marker,
            owner_name: get(Field::OwnerName),
            birth_date: get(Field::BirthToken).as_deref().and_then(dates::parse_birth_token),
            dong,
            ho,
            unit_id,
            owner_address,
            property_address,
            road_address: get(Field::RoadAddress),
            building_area: self.extractor.building_area(row),
            registration_purpose: classify_purpose(purpose_text.as_deref(), cause_text.as_deref()),
            registration_cause_date: cause_text.as_deref().and_then(dates::parse_cause_date),
            mortgage_flag: mortgage.flag,
            mortgage_amount: mortgage.amount,
            holding_period: get(Field::HoldingPeriod),
            seizure_types,
            seizure_flag,
            ownership_type,
            residence_type,
        }
    }

    pub fn normalize(&self, rows: Vec<RawRow>) -> NormalizeOutcome {
        let mut stats = PipelineStats {
            input_rows: rows.len(),
            ..PipelineStats::default()
        };

        if rows.is_empty() {
            tracing::warn!("empty row source, nothing to normalize");
            return NormalizeOutcome {
                records: Vec::new(),
                stats,
            };
        }

        tracing::info!("전처리 시작: {}행", rows.len());

        // 1. 逐行富化 (跳过全空行)
        let enriched: Vec<EnrichedRow> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_blank())
            .map(|(idx, row)| self.enrich(idx, row))
            .collect();
        stats.blank_rows = stats.input_rows - enriched.len();

        for row in &enriched {
            if row.birth_date.is_none() {
                stats.missing_birth_date += 1;
            }
            if row.registration_cause_date.is_none() {
                stats.missing_cause_date += 1;
            }
            if row.mortgage_flag == Flag::Y && row.mortgage_amount.is_none() {
                stats.mortgage_without_amount += 1;
            }
            if row.owner_address.is_none() || row.property_address.is_none() {
                stats.missing_address += 1;
            }
        }

        // 2. 세대 分组 (必须顺序执行)
        let grouping = group_households(enriched);
        stats.dropped_rows = grouping.dropped.len();
        stats.households = grouping.groups.len();
        stats.shared_households = grouping
            .groups
            .iter()
            .filter(|g| g.household_type == HouseholdType::Shared)
            .count();

        // 3. 输出记录
        let records = assemble_all(&grouping.groups);

        tracing::info!(
            "전처리 완료: {}세대, 등기원인일자 누락 {}, 생년월일 누락 {}, 주소 누락 {}",
            records.len(),
            stats.missing_cause_date,
            stats.missing_birth_date,
            stats.missing_address
        );

        NormalizeOutcome { records, stats }
    }
}

impl Default for RegistryPipeline {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}
