// Locale-style number formatting for axis labels.
use serde::{Deserialize, Serialize};

/// Separator and precision rules for rendering prices as text.
///
/// The default mirrors en-US grouping (`42,766.667`); [`NumberFormat::brazilian`]
/// gives the pt-BR form (`42.766,667`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub thousand_separator: char,
    pub decimal_separator: char,
    pub max_fraction_digits: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousand_separator: ',',
            decimal_separator: '.',
            max_fraction_digits: 3,
        }
    }
}

impl NumberFormat {
    pub fn brazilian() -> Self {
        Self {
            thousand_separator: '.',
            decimal_separator: ',',
            max_fraction_digits: 3,
        }
    }

    /// Rounds to `max_fraction_digits`, drops trailing zeros in the fraction
    /// and groups the integer part in threes.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let rounded = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (int_part, frac_part) = match rounded.split_once('.') {
            Some((i, f)) => (i, f.trim_end_matches('0')),
            None => (rounded.as_str(), ""),
        };

        let mut out = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
        // "-0" is not a useful label
        let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
        if value.is_sign_negative() && !is_zero {
            out.push('-');
        }
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push(self.thousand_separator);
            }
            out.push(digit);
        }
        if !frac_part.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_groups_thousands() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.format(43000.0), "43,000");
        assert_eq!(fmt.format(1234567.0), "1,234,567");
        assert_eq!(fmt.format(999.0), "999");
        assert_eq!(fmt.format(0.0), "0");
    }

    #[test]
    fn test_format_rounds_and_trims_fraction() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.format(42766.666666), "42,766.667");
        assert_eq!(fmt.format(12.5), "12.5");
        assert_eq!(fmt.format(12.0004), "12");
    }

    #[test]
    fn test_format_negative_values() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.format(-1500.25), "-1,500.25");
        assert_eq!(fmt.format(-0.0001), "0");
    }

    #[test]
    fn test_format_brazilian() {
        let fmt = NumberFormat::brazilian();
        assert_eq!(fmt.format(600822115.84), "600.822.115,84");
        assert_eq!(fmt.format(124080.0), "124.080");
    }
}
