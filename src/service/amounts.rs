use crate::models::Flag;
use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

const MORTGAGE_MARKER: &str = "근저당";

/// 整行只有 8 位以上数字
static PURE_AMOUNT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*(\d{8,})\s*$").unwrap());

/// 带单位的金额 (원 / 만원 / 억)
static UNIT_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}(?:,\d{3})*(?:\.\d+)?)\s*(?:원|만원|억)").unwrap());

/// 근저당 识别结果
#[derive(Debug, Clone, PartialEq)]
pub struct MortgageInfo {
    pub flag: Flag,
    pub amount: Option<BigDecimal>,
}

pub fn mortgage_flag(lien_type: Option<&str>, lien_content: Option<&str>) -> Flag {
    let has_marker = |text: Option<&str>| text.map_or(false, |t| t.contains(MORTGAGE_MARKER));
    Flag::from(has_marker(lien_type) || has_marker(lien_content))
}

/// 근저당 金额汇总
///
/// 先找整行纯数字 (8 位以上) 求和; 找不到时退回到带单位的数字, 只取数值部分相加,
/// 不做单位换算. 退回路径求和为 0 时返回 None.
pub fn parse_mortgage(lien_type: Option<&str>, lien_content: Option<&str>) -> MortgageInfo {
    let flag = mortgage_flag(lien_type, lien_content);
    let amount = match (flag, lien_content) {
        (Flag::Y, Some(content)) => sum_amounts(content),
        _ => None,
    };
    MortgageInfo { flag, amount }
}

fn sum_amounts(content: &str) -> Option<BigDecimal> {
    // 1. 整行数字按原样精确相加
    let pure: Vec<BigDecimal> = PURE_AMOUNT_LINE
        .captures_iter(content)
        .filter_map(|caps| BigDecimal::from_str(&caps[1]).ok())
        .collect();
    if !pure.is_empty() {
        return Some(pure.into_iter().fold(BigDecimal::from(0), |acc, n| acc + n));
    }

    // 2. 带单位的数字
    let mut matched = false;
    let total = UNIT_AMOUNT
        .captures_iter(content)
        .filter_map(|caps| {
            matched = true;
            BigDecimal::from_str(&caps[1].replace(',', "")).ok()
        })
        .fold(BigDecimal::from(0), |acc, n| acc + n);

    if matched && total > BigDecimal::from(0) {
        Some(total)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(text: &str) -> Option<BigDecimal> {
        Some(BigDecimal::from_str(text).unwrap())
    }

    #[test]
    fn pure_lines_are_summed() {
        let info = parse_mortgage(Some("근저당권설정"), Some("50000000\n30000000"));
        assert_eq!(info.flag, Flag::Y);
        assert_eq!(info.amount, amount("80000000"));
    }

    #[test]
    fn long_digit_lines_sum_exactly() {
        let info = parse_mortgage(Some("근저당"), Some("12345678901234567\n10000000"));
        assert_eq!(info.amount, amount("12345678911234567"));
        assert_eq!(info.amount.unwrap().to_string(), "12345678911234567");
    }

    #[test]
    fn pure_lines_with_surrounding_text() {
        let content = "채권최고액 금\n  120000000  \n근저당권자 주식회사국민은행";
        assert_eq!(parse_mortgage(None, Some(content)).amount, amount("120000000"));
    }

    #[test]
    fn unit_suffix_values_are_not_scaled() {
        let info = parse_mortgage(Some("근저당권"), Some("채권최고액 1,200만원, 3억"));
        assert_eq!(info.amount, amount("1203"));
    }

    #[test]
    fn unit_suffix_summing_to_zero_is_null() {
        // 连续数字紧跟单位时只匹配到末尾的 "000"
        let info = parse_mortgage(Some("근저당권"), Some("금50000원"));
        assert_eq!(info.flag, Flag::Y);
        assert_eq!(info.amount, None);
    }

    #[test]
    fn no_marker_means_no_amount() {
        let info = parse_mortgage(Some("전세권"), Some("50000000"));
        assert_eq!(info.flag, Flag::N);
        assert_eq!(info.amount, None);
    }
}
