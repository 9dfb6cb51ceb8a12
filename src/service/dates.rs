use once_cell::sync::Lazy;
use regex::Regex;

static BIRTH_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{6})(?:-\d{7})?$").unwrap());

/// 按优先级排列的登记原因日期格式
static CAUSE_DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(\d{4})\s*년\s*(\d{1,2})\s*월\s*(\d{1,2})\s*일").unwrap(),
        Regex::new(r"(\d{4})\.(\d{1,2})\.(\d{1,2})").unwrap(),
        Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap(),
    ]
});

static COMPACT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})(\d{2})(\d{2})").unwrap());

/// 생년월일: 6 位数字, 允许带 -7 位 住民番号 后缀; 不做日历校验
pub fn parse_birth_token(value: &str) -> Option<String> {
    BIRTH_TOKEN
        .captures(value.trim())
        .map(|caps| caps[1].to_string())
}

/// 등기원인 日期 -> YYYY-MM-DD, 首个命中的格式生效
pub fn parse_cause_date(cause: &str) -> Option<String> {
    for pattern in CAUSE_DATE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(cause) {
            return Some(format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3]));
        }
    }

    COMPACT_DATE
        .captures(cause)
        .map(|caps| format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
}
