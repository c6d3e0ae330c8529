//! Price quote formatting.

use std::fmt;

use crate::error::InferenceError;

/// Label prefixed to every quote.
pub const LABEL: &str = "💰 Predicted Price: ";

/// Currency glyph of the model's target unit (Indian rupee).
pub const CURRENCY: &str = "₹";

/// A predicted price and its display form.
///
/// Displays as `💰 Predicted Price: ₹62,990.50`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    price: f64,
}

impl PriceQuote {
    /// Wrap a model output. Non-finite values are rejected.
    pub fn new(price: f64) -> Result<Self, InferenceError> {
        if price.is_finite() {
            Ok(Self { price })
        } else {
            Err(InferenceError::NonFinite(price))
        }
    }

    /// The raw predicted value.
    #[inline]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// The amount with currency glyph, without the label.
    pub fn amount(&self) -> String {
        format!("{CURRENCY}{}", group_thousands(self.price))
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LABEL}{}", self.amount())
    }
}

/// Format with two decimals and a comma every three integer digits.
///
/// `1234567.891` becomes `1,234,567.89`; the sign is kept as a leading `-`.
pub fn group_thousands(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    out.push_str(sign);
    let n = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('.');
    out.push_str(frac_part);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0.00")]
    #[case(5.0, "5.00")]
    #[case(999.994, "999.99")]
    #[case(999.995, "1,000.00")]
    #[case(1234.56, "1,234.56")]
    #[case(62990.5, "62,990.50")]
    #[case(100000.0, "100,000.00")]
    #[case(1234567.891, "1,234,567.89")]
    #[case(-1234.5, "-1,234.50")]
    fn groups_and_rounds(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(group_thousands(value), expected);
    }

    #[test]
    fn quote_display_has_label_and_currency() {
        let quote = PriceQuote::new(62990.5).unwrap();
        assert_eq!(quote.to_string(), "💰 Predicted Price: ₹62,990.50");
        assert_eq!(quote.amount(), "₹62,990.50");
        assert_eq!(quote.price(), 62990.5);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn non_finite_is_rejected(#[case] value: f64) {
        assert!(matches!(PriceQuote::new(value), Err(InferenceError::NonFinite(_))));
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;
        use regex::Regex;

        proptest! {
            #[test]
            fn quote_matches_pattern(price in 0.0f64..1e12) {
                let re = Regex::new(r"^💰 Predicted Price: ₹\d{1,3}(,\d{3})*\.\d{2}$").unwrap();
                let text = PriceQuote::new(price).unwrap().to_string();
                prop_assert!(re.is_match(&text), "{}", text);
            }

            #[test]
            fn grouping_preserves_digits(price in 0.0f64..1e12) {
                let grouped = group_thousands(price);
                prop_assert_eq!(grouped.replace(',', ""), format!("{price:.2}"));
            }
        }
    }
}
