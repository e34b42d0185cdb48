//! Currency, date and reservation-code normalization.
//!
//! Rewrites are conservative: only unambiguous amounts and calendar-valid
//! dates are touched. Reservation codes are collected, never substituted.

use super::block::map_outside_blocks;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}(?:[,.]\d{3})*(?:[,.]\d+)?)(\s*(?:원|(?i:krw)|₩))?").expect("valid regex")
});

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[-./](\d{1,2})[-./](\d{1,2})").expect("valid regex"));

static KOREAN_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})\s*년\s*(\d{1,2})\s*월\s*(\d{1,2})(?:\s*일)?").expect("valid regex")
});

static RESERVATION_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:PZ|H[PX])\d{8,12}\b").expect("valid regex"));

/// Options for normalization.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Rewrite currency amounts to `<digits> KRW`
    pub amounts: bool,

    /// Rewrite dates to `YYYY-MM-DD`
    pub dates: bool,

    /// Leave the interior of `[[TABLE]]`/`[[DIAGRAM]]` blocks untouched
    pub preserve_blocks: bool,
}

impl NormalizeOptions {
    /// Create default options (amounts and dates on).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable amount rewriting.
    pub fn with_amounts(mut self, enabled: bool) -> Self {
        self.amounts = enabled;
        self
    }

    /// Enable or disable date rewriting.
    pub fn with_dates(mut self, enabled: bool) -> Self {
        self.dates = enabled;
        self
    }

    /// Skip block interiors.
    pub fn with_preserve_blocks(mut self, preserve: bool) -> Self {
        self.preserve_blocks = preserve;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            amounts: true,
            dates: true,
            preserve_blocks: false,
        }
    }
}

/// Apply amount and date rewriting according to `options`.
///
/// Blank input is returned unchanged.
pub fn normalize(text: &str, options: &NormalizeOptions) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let apply = |segment: &str| {
        let mut result = segment.to_string();
        if options.amounts {
            result = normalize_amounts(&result);
        }
        if options.dates {
            result = normalize_dates(&result);
        }
        result
    };

    if options.preserve_blocks {
        map_outside_blocks(text, apply)
    } else {
        apply(text)
    }
}

fn has_separator(number: &str) -> bool {
    number.contains(',') || (number.contains('.') && number.len() > 4)
}

/// Rewrite currency amounts as `<digits> KRW`.
///
/// A match is rewritten when a unit (`원`, `KRW`, `₩`) follows the number,
/// or when the number carries a comma (or a dot and more than four
/// characters). Bare short numbers and decimals are left alone; dotted
/// dates never form a single match.
pub fn normalize_amounts(text: &str) -> String {
    AMOUNT
        .replace_all(text, |caps: &Captures| {
            let whole = caps[0].to_string();
            let number = &caps[1];
            let has_unit = caps.get(2).is_some();
            if !has_unit && !has_separator(number) {
                return whole;
            }

            let digits: String = number.chars().filter(|c| *c != ',' && *c != '.').collect();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return whole;
            }
            format!("{} KRW", digits)
        })
        .into_owned()
}

fn iso_date(caps: &Captures) -> String {
    let parsed = (
        caps[1].parse::<i32>(),
        caps[2].parse::<u32>(),
        caps[3].parse::<u32>(),
    );
    match parsed {
        (Ok(y), Ok(m), Ok(d)) => match NaiveDate::from_ymd_opt(y, m, d) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => caps[0].to_string(),
        },
        _ => caps[0].to_string(),
    }
}

/// Rewrite `YYYY[-./]M[-./]D` and `YYYY년 M월 D일` dates as `YYYY-MM-DD`.
///
/// Calendar-invalid dates are left unchanged.
pub fn normalize_dates(text: &str) -> String {
    let text = NUMERIC_DATE.replace_all(text, iso_date);
    KOREAN_DATE.replace_all(&text, iso_date).into_owned()
}

/// Collect reservation codes (`PZ`, `HP`, `HX` followed by 8-12 digits).
///
/// Codes are returned distinct, in order of first appearance, with their
/// original case.
pub fn extract_reservation_codes(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    RESERVATION_CODE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|code| seen.insert(*code))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amounts() {
        assert_eq!(normalize_amounts("가격 1,000원"), "가격 1000 KRW");
        assert_eq!(normalize_amounts("1,000 원"), "1000 KRW");
        assert_eq!(normalize_amounts("5000원"), "5000 KRW");
        assert_eq!(normalize_amounts("1.000₩"), "1000 KRW");
        assert_eq!(normalize_amounts("30 krw"), "30 KRW");
        assert_eq!(normalize_amounts("total 1,234,567"), "total 1234567 KRW");
        assert_eq!(normalize_amounts("3.5원"), "35 KRW");
        assert_eq!(normalize_amounts("1,000.50원"), "100050 KRW");
    }

    #[test]
    fn test_amounts_left_alone() {
        assert_eq!(normalize_amounts("1000"), "1000");
        assert_eq!(normalize_amounts("3.5"), "3.5");
        assert_eq!(normalize_amounts("V1.0"), "V1.0");
        assert_eq!(normalize_amounts("2024.03.05"), "2024.03.05");
    }

    #[test]
    fn test_dates() {
        assert_eq!(normalize_dates("2024.03.05"), "2024-03-05");
        assert_eq!(normalize_dates("2024/3/5"), "2024-03-05");
        assert_eq!(normalize_dates("2024년 3월 5일"), "2024-03-05");
        assert_eq!(normalize_dates("2024년3월5"), "2024-03-05");
        assert_eq!(normalize_dates("2024-03-05"), "2024-03-05");
    }

    #[test]
    fn test_invalid_dates_unchanged() {
        assert_eq!(normalize_dates("2024.13.45"), "2024.13.45");
        assert_eq!(normalize_dates("2023년 2월 29일"), "2023년 2월 29일");
    }

    #[test]
    fn test_reservation_codes() {
        let text = "예약 PZ123456789 확인, HP2500000002 / PZ123456789";
        assert_eq!(
            extract_reservation_codes(text),
            vec!["PZ123456789", "HP2500000002"]
        );
    }

    #[test]
    fn test_reservation_codes_first_seen_order() {
        let text = "hx1234567890 then pz12345678 then HX1234567890";
        assert_eq!(
            extract_reservation_codes(text),
            vec!["hx1234567890", "pz12345678", "HX1234567890"]
        );
        assert!(extract_reservation_codes("PZ1234567 XPZ12345678").is_empty());
    }

    #[test]
    fn test_normalize_flags() {
        let text = "1,000원 on 2024.03.05";
        assert_eq!(normalize(text, &NormalizeOptions::default()), "1000 KRW on 2024-03-05");
        assert_eq!(
            normalize(text, &NormalizeOptions::new().with_amounts(false)),
            "1,000원 on 2024-03-05"
        );
        assert_eq!(
            normalize(text, &NormalizeOptions::new().with_dates(false)),
            "1000 KRW on 2024.03.05"
        );
        assert_eq!(normalize("   ", &NormalizeOptions::default()), "   ");
    }

    #[test]
    fn test_preserve_blocks() {
        let text = "1,000원\n[[TABLE]]\n| 2,000원 |\n[[/TABLE]]";
        let opts = NormalizeOptions::new().with_preserve_blocks(true);
        assert_eq!(
            normalize(text, &opts),
            "1000 KRW\n[[TABLE]]\n| 2,000원 |\n[[/TABLE]]"
        );
        assert_eq!(
            normalize(text, &NormalizeOptions::default()),
            "1000 KRW\n[[TABLE]]\n| 2000 KRW |\n[[/TABLE]]"
        );
    }
}
