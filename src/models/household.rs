use super::registry::{EnrichedRow, HouseholdType, OwnershipType, ResidenceType};

/// 세대 그룹: 共享同一连番的行, 按原始顺序
#[derive(Debug, Clone)]
pub struct HouseholdGroup {
    pub group_id: String,
    pub members: Vec<EnrichedRow>,
    pub household_type: HouseholdType,
    pub resolved_residence_type: ResidenceType,
}

impl HouseholdGroup {
    /// 代表行 (组内第一行)
    pub fn representative(&self) -> &EnrichedRow {
        &self.members[0]
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn co_owner_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.ownership_type == OwnershipType::CoOwner)
            .count()
    }

    pub fn sole_owner_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.ownership_type == OwnershipType::SoleOwner)
            .count()
    }
}
