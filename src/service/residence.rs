use crate::config::{ResidenceConfig, ScoringVariant};
use crate::models::ResidenceType;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// 地址规范化时依次删除的片段
static NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\([^)]*\)").unwrap(),
        Regex::new(r"[()]").unwrap(),
        Regex::new(r"외\s*\d+필지").unwrap(),
        Regex::new(r"제\d+층").unwrap(),
        Regex::new(r"제\d+동").unwrap(),
        Regex::new(r"\d+동").unwrap(),
        Regex::new(r"\d+호").unwrap(),
    ]
});

static REGION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(서울특별시|부산광역시|대구광역시|인천광역시|광주광역시|대전광역시|울산광역시|세종특별자치시",
        r"|경기도|강원도|강원특별자치도|충청북도|충청남도|전라북도|전북특별자치도|전라남도",
        r"|경상북도|경상남도|제주특별자치도)",
        r"\s+([가-힣]+(?:구|시|군))\s*([가-힣]+(?:동|읍|면|가))?"
    ))
    .unwrap()
});

static BUILDING_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([가-힣]+(?:아파트|오피스텔|빌라|빌딩|센터|타워|힐스|클래스|파크|빌|마을|단지))").unwrap()
});

static LOT_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:-\d+)?)").unwrap());

/// 시/도, 구/시/군, 동/읍/면
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub city: String,
    pub district: String,
    pub neighborhood: Option<String>,
}

/// 去掉括号内容, 필지/층/동/호 等与地段无关的片段
pub fn normalize_address(address: &str) -> String {
    let mut normalized = WHITESPACE.replace_all(address, " ").into_owned();
    for pattern in NOISE_PATTERNS.iter() {
        normalized = pattern.replace_all(&normalized, "").into_owned();
    }
    normalized.trim().to_string()
}

pub fn extract_region(normalized: &str) -> Option<Region> {
    let caps = REGION.captures(normalized)?;
    Some(Region {
        city: caps[1].to_string(),
        district: caps[2].to_string(),
        neighborhood: caps.get(3).map(|m| m.as_str().to_string()),
    })
}

/// 三段式匹配分数 [0, 1]: 시/도 0.3, 구 0.4, 동 0.3
pub fn canonical_score(owner: &str, property: &str) -> f64 {
    let owner = normalize_address(owner);
    let property = normalize_address(property);
    region_score(&owner, &property)
}

fn region_score(normalized_owner: &str, normalized_property: &str) -> f64 {
    let (Some(o), Some(p)) = (
        extract_region(normalized_owner),
        extract_region(normalized_property),
    ) else {
        return 0.0;
    };

    // 以十分之一为单位累加, 避免浮点误差
    let mut points = 0u32;
    if o.city == p.city {
        points += 3;
    }
    if o.district == p.district {
        points += 4;
    }
    if let (Some(a), Some(b)) = (&o.neighborhood, &p.neighborhood) {
        if a == b {
            points += 3;
        }
    }

    (points as f64 / 10.0).min(1.0)
}

/// canonical + 建筑名/地番 加分 + 全串相似度
pub fn detailed_score(owner: &str, property: &str) -> f64 {
    let owner = normalize_address(owner);
    let property = normalize_address(property);

    if extract_region(&owner).is_none() || extract_region(&property).is_none() {
        return 0.0;
    }

    let mut score = region_score(&owner, &property);
    if let (Some(a), Some(b)) = (building_key(&owner), building_key(&property)) {
        if a == b {
            score += 0.2;
        } else if string_similarity(&a, &b) > 0.7 {
            score += 0.1;
        }
    }
    score += string_similarity(&owner, &property) * 0.1;

    score.min(1.0)
}

/// 建筑名优先, 否则取第一个地番
fn building_key(normalized: &str) -> Option<String> {
    BUILDING_NAME
        .captures(normalized)
        .or_else(|| LOT_NUMBER.captures(normalized))
        .map(|caps| caps[1].to_string())
}

/// Levenshtein 相似度: (max_len - distance) / max_len, 按字符计
pub fn string_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let distance = strsim::levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// 实际居住 / 投资 判定
#[derive(Debug, Clone)]
pub struct ResidenceClassifier {
    threshold: f64,
    variant: ScoringVariant,
}

impl ResidenceClassifier {
    pub fn new(config: &ResidenceConfig) -> Self {
        Self {
            threshold: config.threshold,
            variant: config.scoring,
        }
    }

    pub fn match_score(&self, owner: &str, property: &str) -> f64 {
        match self.variant {
            ScoringVariant::Canonical => canonical_score(owner, property),
            ScoringVariant::Detailed => detailed_score(owner, property),
        }
    }

    pub fn classify_score(&self, score: f64) -> ResidenceType {
        if score >= self.threshold {
            ResidenceType::Resident
        } else {
            ResidenceType::Investor
        }
    }

    pub fn classify(
        &self,
        owner_address: Option<&str>,
        property_address: Option<&str>,
        unit_id: Option<&str>,
    ) -> ResidenceType {
        // 任一地址缺失时无法判断
        let (Some(owner), Some(property)) = (owner_address, property_address) else {
            return ResidenceType::NoInformation;
        };
        if owner.is_empty() || property.is_empty() {
            return ResidenceType::NoInformation;
        }

        // 1. 동호수 出现在소유자 주소中
        if let Some(unit) = unit_id.filter(|u| !u.is_empty()) {
            if owner.contains(unit) {
                return ResidenceType::Resident;
            }
        }

        // 2. 地址匹配分数
        self.classify_score(self.match_score(owner, property))
    }
}

impl Default for ResidenceClassifier {
    fn default() -> Self {
        Self::new(&ResidenceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_unit_noise() {
        assert_eq!(
            normalize_address("서울특별시  광진구 구의동 76-1 (그랜드파크) 제3층 101동 1203호 외 2필지"),
            "서울특별시 광진구 구의동 76-1"
        );
    }

    #[test]
    fn region_extraction() {
        let region = extract_region("서울특별시 강남구 역삼동 123").unwrap();
        assert_eq!(region.city, "서울특별시");
        assert_eq!(region.district, "강남구");
        assert_eq!(region.neighborhood.as_deref(), Some("역삼동"));

        let region = extract_region("서울특별시 강남구 테헤란로 152").unwrap();
        assert_eq!(region.neighborhood, None);
        assert!(extract_region("강남구 역삼동").is_none());
    }

    #[test]
    fn same_neighborhood_scores_full() {
        let score = canonical_score("서울특별시 강남구 역삼동 123", "서울특별시 강남구 역삼동 45");
        assert!(score >= 0.7);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn partial_matches() {
        assert_eq!(canonical_score("서울특별시 강남구 역삼동 1", "서울특별시 강남구 삼성동 2"), 0.7);
        assert_eq!(canonical_score("서울특별시 서초구 서초동 1", "서울특별시 강남구 삼성동 2"), 0.3);
        assert_eq!(canonical_score("경기도 성남시", "서울특별시 강남구 삼성동 2"), 0.0);
        assert_eq!(canonical_score("미국 뉴욕", "서울특별시 강남구 삼성동 2"), 0.0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let classifier = ResidenceClassifier::default();
        assert_eq!(classifier.classify_score(0.8), ResidenceType::Resident);
        assert_eq!(classifier.classify_score(0.799_999), ResidenceType::Investor);
        assert_eq!(classifier.classify_score(0.7), ResidenceType::Investor);
    }

    #[test]
    fn unit_id_in_owner_address_is_resident() {
        let classifier = ResidenceClassifier::default();
        let kind = classifier.classify(
            Some("부산광역시 해운대구 우동 1408 101동 1203호"),
            Some("서울특별시 강남구 역삼동 45"),
            Some("101동 1203호"),
        );
        assert_eq!(kind, ResidenceType::Resident);
    }

    #[test]
    fn missing_address_is_no_information() {
        let classifier = ResidenceClassifier::default();
        assert_eq!(
            classifier.classify(None, Some("서울특별시 강남구 역삼동 45"), Some("101동 1203호")),
            ResidenceType::NoInformation
        );
        assert_eq!(
            classifier.classify(Some("서울특별시 강남구 역삼동 45 101동 1203호"), None, Some("101동 1203호")),
            ResidenceType::NoInformation
        );
    }

    #[test]
    fn investor_when_districts_differ() {
        let classifier = ResidenceClassifier::default();
        let kind = classifier.classify(
            Some("경기도 수원시 영통동 12"),
            Some("서울특별시 강남구 역삼동 45"),
            None,
        );
        assert_eq!(kind, ResidenceType::Investor);
    }

    #[test]
    fn detailed_variant_rewards_same_lot() {
        let owner = "서울특별시 강남구 테헤란로 152";
        let property = "서울특별시 강남구 테헤란로 152";

        let canonical = ResidenceClassifier::default();
        assert_eq!(canonical.classify(Some(owner), Some(property), None), ResidenceType::Investor);

        let detailed = ResidenceClassifier::new(&ResidenceConfig {
            scoring: ScoringVariant::Detailed,
            ..ResidenceConfig::default()
        });
        assert!(detailed.match_score(owner, property) > 0.99);
        assert_eq!(detailed.classify(Some(owner), Some(property), None), ResidenceType::Resident);
    }

    #[test]
    fn levenshtein_similarity() {
        assert_eq!(string_similarity("abc", "abc"), 1.0);
        assert_eq!(string_similarity("", "abc"), 0.0);
        assert_eq!(string_similarity("래미안", "래미안아파트"), 0.5);
        assert!((string_similarity("kitten", "sitting") - 4.0 / 7.0).abs() < 1e-9);
    }
}
