use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;

pub trait BigDecimalHelpers {
    fn to_i64_or_zero(&self) -> i64;
}

impl BigDecimalHelpers for BigDecimal {
    fn to_i64_or_zero(&self) -> i64 {
        self.to_i64().unwrap_or(0)
    }
}

impl BigDecimalHelpers for Option<BigDecimal> {
    fn to_i64_or_zero(&self) -> i64 {
        self.as_ref()
            .map(|bd| bd.to_i64().unwrap_or(0))
            .unwrap_or(0)
    }
}

/// Whole number with comma thousands separators, e.g. `1250000` -> `1,250,000`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(150_000), "150,000");
        assert_eq!(format_thousands(1_250_000), "1,250,000");
        assert_eq!(format_thousands(-42_500), "-42,500");
    }

    #[test]
    fn test_to_i64_or_zero() {
        assert_eq!(BigDecimal::from_str("120000.75").unwrap().to_i64_or_zero(), 120_000);
        assert_eq!(None::<BigDecimal>.to_i64_or_zero(), 0);
    }
}
