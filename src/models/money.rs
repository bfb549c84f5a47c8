use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Monetary value held as an integer count of paise (1/100 rupee).
///
/// The arithmetic operators saturate. Derived record fields go through the
/// `checked_*` methods so an out-of-range total is rejected instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_paise(paise: i64) -> Self {
        Amount(paise)
    }

    pub const fn from_rupees(rupees: i64) -> Self {
        Amount(rupees * 100)
    }

    pub const fn paise(self) -> i64 {
        self.0
    }

    pub fn rupees(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a non-integral factor (area, quantity, percentage),
    /// rounding to the nearest paisa.
    pub fn scale(self, factor: f64) -> Amount {
        Amount((self.0 as f64 * factor).round() as i64)
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// [`Amount::scale`] that yields `None` instead of clamping when the
    /// product does not fit in an `i64` or the factor is not finite.
    pub fn checked_scale(self, factor: f64) -> Option<Amount> {
        let product = (self.0 as f64 * factor).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range.
        if product.is_finite() && product >= i64::MIN as f64 && product < i64::MAX as f64 {
            Some(Amount(product as i64))
        } else {
            None
        }
    }

    /// Parses a display-formatted amount such as `"₹55,00,000"` or
    /// `"Rs. 1,250.50"` by discarding everything that is not a digit.
    /// At most two digits after the first `.` that follows a digit are read
    /// as paise. Input without any digits parses as zero.
    pub fn parse_formatted(raw: &str) -> Amount {
        let numeric: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let numeric = numeric.trim_start_matches('.');
        let (whole, fraction) = numeric.split_once('.').unwrap_or((numeric, ""));

        let rupees = whole
            .chars()
            .filter_map(|c| c.to_digit(10))
            .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(d as i64));

        let mut paise_digits = fraction.chars().filter_map(|c| c.to_digit(10));
        let tens = paise_digits.next().unwrap_or(0) as i64;
        let units = paise_digits.next().unwrap_or(0) as i64;

        Amount(rupees.saturating_mul(100).saturating_add(tens * 10 + units))
    }

    /// Plain decimal form used in exports: `5500000.00`.
    pub fn to_plain_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    /// Display form with Indian digit grouping: `₹55,00,000.00`.
    pub fn format_with_symbol(self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{symbol}{}.{:02}", group_indian(abs / 100), abs % 100)
    }
}

fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("₹"))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

/// Rounded integer percentage of `part` in `whole`; zero when `whole` is not positive.
pub fn percentage(part: Amount, whole: Amount) -> u32 {
    if whole.0 <= 0 {
        return 0;
    }
    (part.0 as f64 / whole.0 as f64 * 100.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formatted_currency_by_stripping_non_digits() {
        assert_eq!(Amount::parse_formatted("₹55,00,000"), Amount::from_rupees(5_500_000));
        assert_eq!(Amount::parse_formatted("Rs. 1,250.5"), Amount::from_paise(125_050));
        assert_eq!(Amount::parse_formatted("₹ 12,000.75"), Amount::from_paise(1_200_075));
        assert_eq!(Amount::parse_formatted("n/a"), Amount::ZERO);
    }

    #[test]
    fn formats_with_indian_grouping() {
        assert_eq!(Amount::from_rupees(5_500_000).to_string(), "₹55,00,000.00");
        assert_eq!(Amount::from_rupees(880_000_000).to_string(), "₹88,00,00,000.00");
        assert_eq!(Amount::from_rupees(999).to_string(), "₹999.00");
        assert_eq!(Amount::from_paise(-125_050).format_with_symbol("Rs "), "-Rs 1,250.50");
    }

    #[test]
    fn plain_string_has_no_grouping() {
        assert_eq!(Amount::from_rupees(5_500_000).to_plain_string(), "5500000.00");
        assert_eq!(Amount::from_paise(-5).to_plain_string(), "-0.05");
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let max = Amount::from_paise(i64::MAX);
        assert_eq!(max.checked_add(Amount::from_paise(1)), None);
        assert_eq!(Amount::from_paise(i64::MIN).checked_sub(Amount::from_paise(1)), None);
        assert_eq!(max.checked_scale(2.0), None);
        assert_eq!(Amount::from_rupees(10).checked_scale(f64::INFINITY), None);
        assert_eq!(
            Amount::from_rupees(2_500).checked_scale(1.5),
            Some(Amount::from_rupees(3_750))
        );
    }

    #[test]
    fn operators_saturate_instead_of_wrapping() {
        let max = Amount::from_paise(i64::MAX);
        assert_eq!(max + Amount::from_paise(1), max);
        assert_eq!(Amount::from_paise(i64::MIN) - Amount::from_paise(1), Amount::from_paise(i64::MIN));
        assert_eq!([max, max].iter().sum::<Amount>(), max);
    }

    #[test]
    fn percentage_rounds_and_guards_zero() {
        assert_eq!(
            percentage(Amount::from_rupees(531_000_000), Amount::from_rupees(880_000_000)),
            60
        );
        assert_eq!(percentage(Amount::from_rupees(10), Amount::ZERO), 0);
    }
}
