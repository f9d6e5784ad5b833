//! Currency amounts and lenient parsing of upstream values.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal`; upstream values that cannot be
//! read as a finite decimal are reported as `None` so callers can treat them
//! as a zero contribution.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// One cent, the comparison tolerance for currency amounts.
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest magnitude accepted from upstream (10^15).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Rounds an amount to cents, half away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if two amounts differ by at most one cent.
#[must_use]
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= CENT
}

/// Reads a JSON value as a decimal amount.
///
/// Accepts numbers and numeric strings (`"1 200,50"`, `"1200.5"`, `"1e3"`).
/// Returns `None` for null, booleans, empty strings, anything that does not
/// parse as a finite number (`"NaN"`, `"abc"`) and magnitudes above
/// [`MAX_AMOUNT`].
#[must_use]
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(s),
        _ => None,
    }
}

fn parse_decimal_str(raw: &str) -> Option<Decimal> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    if compact.is_empty() {
        return None;
    }
    let normalized = if compact.contains(',') && !compact.contains('.') {
        compact.replace(',', ".")
    } else {
        compact.replace(',', "")
    };
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
        .filter(|amount| amount.abs() <= MAX_AMOUNT)
}

/// Reads a date from the formats upstream sources emit.
///
/// Supports `YYYY-MM-DD`, RFC 3339 timestamps, naive ISO timestamps and
/// `DD/MM/YYYY`. Returns `None` for anything else.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_constants() {
        assert_eq!(CENT, dec!(0.01));
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec!(10.005)), dec!(10.01));
        assert_eq!(round_cents(dec!(-10.005)), dec!(-10.01));
        assert_eq!(round_cents(dec!(3.14159)), dec!(3.14));
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(dec!(100.00), dec!(100.01)));
        assert!(!approx_eq(dec!(100.00), dec!(100.02)));
    }

    #[rstest]
    #[case(json!(1200), Some(dec!(1200)))]
    #[case(json!(1200.5), Some(dec!(1200.5)))]
    #[case(json!("1200.50"), Some(dec!(1200.50)))]
    #[case(json!("1 200,50"), Some(dec!(1200.50)))]
    #[case(json!("1,200.50"), Some(dec!(1200.50)))]
    #[case(json!("-45"), Some(dec!(-45)))]
    #[case(json!("1e3"), Some(dec!(1000)))]
    #[case(json!("NaN"), None)]
    #[case(json!("abc"), None)]
    #[case(json!(""), None)]
    #[case(json!(null), None)]
    #[case(json!(true), None)]
    #[case(json!("1000000000000000"), Some(dec!(1000000000000000)))]
    #[case(json!("-1000000000000000.01"), None)]
    #[case(json!("50000000000000000000000000000"), None)]
    #[case(json!("99999999999999999999999999999999"), None)]
    fn test_parse_amount(#[case] value: Value, #[case] expected: Option<Decimal>) {
        assert_eq!(parse_amount(&value), expected);
    }

    #[rstest]
    #[case("2024-03-10", Some((2024, 3, 10)))]
    #[case("2024-03-10T23:30:00Z", Some((2024, 3, 10)))]
    #[case("2024-03-10T08:15:00.000", Some((2024, 3, 10)))]
    #[case("10/03/2024", Some((2024, 3, 10)))]
    #[case("2024-02-30", None)]
    #[case("not a date", None)]
    #[case("", None)]
    fn test_parse_date(#[case] raw: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let expected = expected.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        assert_eq!(parse_date(raw), expected);
    }
}
