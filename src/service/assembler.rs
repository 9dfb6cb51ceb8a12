use crate::models::{CanonicalHouseholdRecord, HouseholdGroup};

/// 组代表行 + 组级汇总 -> 固定输出结构
pub fn assemble(group: &HouseholdGroup) -> CanonicalHouseholdRecord {
    let rep = group.representative();

    CanonicalHouseholdRecord {
        owner_name: rep.owner_name.clone(),
        birth_date: rep.birth_date.clone(),
        unit_id: rep.unit_id.clone(),
        owner_address: rep.owner_address.clone(),
        property_address: rep.property_address.clone(),
        road_address: rep.road_address.clone(),
        building_area: rep.building_area,
        residence_type: group.resolved_residence_type,
        registration_purpose: rep.registration_purpose,
        registration_cause_date: rep.registration_cause_date.clone(),
        mortgage_flag: rep.mortgage_flag,
        mortgage_amount: rep.mortgage_amount.clone(),
        holding_period: rep.holding_period.clone(),
        seizure_types: rep.seizure_types.clone(),
        ownership_type: rep.ownership_type,
        household_type: group.household_type,
        co_owner_count: group.co_owner_count() as u32,
        sole_owner_count: group.sole_owner_count() as u32,
    }
}

pub fn assemble_all(groups: &[HouseholdGroup]) -> Vec<CanonicalHouseholdRecord> {
    groups.iter().map(assemble).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HouseholdType, OwnershipType, ResidenceType};
    use crate::service::grouper::tests::member;

    #[test]
    fn representative_fields_and_group_aggregates() {
        let mut rep = member(Some(4), Some("-"), "대표");
        rep.birth_date = Some("850315".to_string());
        let group = HouseholdGroup {
            group_id: "4".to_string(),
            members: vec![rep, member(None, Some("-"), "공유자"), member(None, None, "기타")],
            household_type: HouseholdType::Shared,
            resolved_residence_type: ResidenceType::Resident,
        };

        let record = assemble(&group);
        assert_eq!(record.owner_name.as_deref(), Some("대표"));
        assert_eq!(record.birth_date.as_deref(), Some("850315"));
        assert_eq!(record.residence_type, ResidenceType::Resident);
        assert_eq!(record.ownership_type, OwnershipType::CoOwner);
        assert_eq!(record.household_type, HouseholdType::Shared);
        assert_eq!(record.co_owner_count, 2);
        assert_eq!(record.sole_owner_count, 1);
        assert_eq!(record.mortgage_amount, None);
    }
}
