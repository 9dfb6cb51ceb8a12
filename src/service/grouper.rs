use crate::models::{EnrichedRow, HouseholdGroup, HouseholdType, ResidenceType};
use indexmap::IndexMap;
use std::collections::HashMap;

/// 首行没有连番时使用的默认组号
const FALLBACK_GROUP_ID: &str = "1";

/// 分组结果
#[derive(Debug, Clone, Default)]
pub struct GroupingOutcome {
    pub groups: Vec<HouseholdGroup>,
    /// 无任何信号而被丢弃的行
    pub dropped: Vec<EnrichedRow>,
}

/// 丢弃没有连番, 소유자명, 동/호/동호수 的行 (保序)
pub fn retain_with_signal(rows: Vec<EnrichedRow>) -> (Vec<EnrichedRow>, Vec<EnrichedRow>) {
    rows.into_iter().partition(EnrichedRow::has_signal)
}

/// 按原始顺序折叠出 (行, 组号): 有连番则开新组, 否则沿用上一行的组号
pub fn assign_groups(rows: Vec<EnrichedRow>) -> Vec<(EnrichedRow, String)> {
    rows.into_iter()
        .scan(None::<String>, |current, row| {
            if let Some(n) = row.sequence_number {
                *current = Some(n.to_string());
            }
            let group_id = current
                .get_or_insert_with(|| FALLBACK_GROUP_ID.to_string())
                .clone();
            Some((row, group_id))
        })
        .collect()
}

/// 按组号分区, 保持首次出现的顺序
pub fn partition(assigned: Vec<(EnrichedRow, String)>) -> IndexMap<String, Vec<EnrichedRow>> {
    let mut groups: IndexMap<String, Vec<EnrichedRow>> = IndexMap::new();
    for (row, group_id) in assigned {
        groups.entry(group_id).or_default().push(row);
    }
    groups
}

/// 组内居住形态冲突: 有실거주 则실거주, 其次실거주(추정), 否则取众数 (平局取투자)
pub fn resolve_residence(members: &[EnrichedRow]) -> ResidenceType {
    let types: Vec<ResidenceType> = members.iter().map(|m| m.residence_type).collect();

    if types.contains(&ResidenceType::Resident) {
        return ResidenceType::Resident;
    }
    if types.contains(&ResidenceType::ResidentEstimated) {
        return ResidenceType::ResidentEstimated;
    }

    let mut counts: HashMap<ResidenceType, usize> = HashMap::new();
    for t in &types {
        *counts.entry(*t).or_insert(0) += 1;
    }
    let max = counts.values().copied().max().unwrap_or(0);
    if counts.get(&ResidenceType::Investor).copied().unwrap_or(0) == max {
        return ResidenceType::Investor;
    }

    types
        .into_iter()
        .find(|t| counts.get(t).copied() == Some(max))
        .unwrap_or(ResidenceType::Investor)
}

pub fn group_households(rows: Vec<EnrichedRow>) -> GroupingOutcome {
    let total = rows.len();

    // 1. 过滤无信号行
    let (kept, dropped) = retain_with_signal(rows);
    tracing::info!("有效行: {} -> {} (丢弃 {})", total, kept.len(), dropped.len());
    for row in dropped.iter().take(10) {
        tracing::warn!(
            "dropped row {}: sequence={:?}, owner={:?}, unit={:?}",
            row.row_index, row.sequence_text, row.owner_name, row.unit_id
        );
    }

    // 2-3. 折叠分组并分区
    let partitioned = partition(assign_groups(kept));

    // 4-5. 每组一个代表
    let groups: Vec<HouseholdGroup> = partitioned
        .into_iter()
        .map(|(group_id, members)| {
            let household_type = if members.iter().any(EnrichedRow::is_shared_marker) {
                HouseholdType::Shared
            } else {
                HouseholdType::Sole
            };
            let resolved_residence_type = resolve_residence(&members);
            HouseholdGroup {
                group_id,
                members,
                household_type,
                resolved_residence_type,
            }
        })
        .collect();

    let shared = groups
        .iter()
        .filter(|g| g.household_type == HouseholdType::Shared)
        .count();
    let people: usize = groups.iter().map(HouseholdGroup::member_count).sum();
    tracing::info!(
        "分组完成: {} 户 (共有 {}, 单独 {}), 总人数 {}",
        groups.len(),
        shared,
        groups.len() - shared,
        people
    );

    GroupingOutcome { groups, dropped }
}
