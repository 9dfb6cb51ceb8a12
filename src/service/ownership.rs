use crate::models::{Flag, OwnershipType};

const SHARED_MARKER: &str = "공유";
const NO_SEIZURE: &str = "없음";

/// 固定优先级: 압류 在前, 가압류 在后
const SEIZURE_KINDS: [&str; 2] = ["압류", "가압류"];

/// 소유구분 含 "공유" 或 공유 列为 "-" 即为共有人
pub fn classify_ownership(division: Option<&str>, marker: Option<&str>) -> OwnershipType {
    let shared_division = division.map_or(false, |d| d.contains(SHARED_MARKER));
    if shared_division || marker == Some("-") {
        OwnershipType::CoOwner
    } else {
        OwnershipType::SoleOwner
    }
}

/// 압류/가압류 检出, 返回 (展示文本, Y/N)
///
/// 按子串检查, "가압류" 本身也包含 "압류", 因此只有 가압류 时两种都会列出.
pub fn seizure_types(lien_type: Option<&str>, lien_content: Option<&str>) -> (String, Flag) {
    let combined = format!("{} {}", lien_type.unwrap_or(""), lien_content.unwrap_or(""));

    let found: Vec<&str> = SEIZURE_KINDS
        .iter()
        .copied()
        .filter(|kind| combined.contains(kind))
        .collect();

    if found.is_empty() {
        (NO_SEIZURE.to_string(), Flag::N)
    } else {
        (found.join(", "), Flag::Y)
    }
}
