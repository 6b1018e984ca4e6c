/// Strip everything except ASCII digits from a phone number
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Compare two phone numbers by their last 10 digits.
///
/// Shoppers type `+8801712345678`, `01712345678` or `1712-345678` for the
/// same line; the national significant part is what identifies it.
pub fn phones_match(a: &str, b: &str) -> bool {
    const SIGNIFICANT_DIGITS: usize = 10;
    let a = normalize_phone(a);
    let b = normalize_phone(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let tail = |s: &str| s[s.len().saturating_sub(SIGNIFICANT_DIGITS)..].to_string();
    tail(&a) == tail(&b)
}

/// Human-facing order number: `ORD-YYYYMMDD-NNNN`
pub fn order_number(now: chrono::DateTime<chrono::Utc>, suffix: u16) -> String {
    format!("ORD-{}-{:04}", now.format("%Y%m%d"), suffix % 10_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_phones_match_ignores_formatting() {
        assert!(phones_match("+8801712345678", "01712345678"));
        assert!(phones_match("01712-345678", "01712 345 678"));
        assert!(!phones_match("01712345678", "01812345678"));
        assert!(!phones_match("", "01712345678"));
    }

    #[test]
    fn test_order_number_format() {
        let now = chrono::Utc.with_ymd_and_hms(2026, 1, 18, 9, 0, 0).unwrap();
        assert_eq!(order_number(now, 4821), "ORD-20260118-4821");
        assert_eq!(order_number(now, 7), "ORD-20260118-0007");
    }
}
