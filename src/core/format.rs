use serde::{Deserialize, Serialize};

/// Display formats for dashboard statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    #[default]
    Plain,
    Grouped,
    Indian,
    Inr,
}

impl NumberFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            NumberFormat::Plain => format_plain(value),
            NumberFormat::Grouped => format_grouped(value),
            NumberFormat::Indian => format_indian(value),
            NumberFormat::Inr => format_inr(value),
        }
    }

    pub fn formatter(self) -> Box<dyn Fn(f64) -> String + Send> {
        Box::new(move |value| self.format(value))
    }
}

pub fn format_plain(value: f64) -> String {
    value.to_string()
}

/// `1234567` → `1,234,567`
pub fn format_grouped(value: f64) -> String {
    group_digits(value, |digits| group_from_right(digits, 3, 3))
}

/// 印度式分組（lakh / crore）：`1234567` → `12,34,567`
pub fn format_indian(value: f64) -> String {
    group_digits(value, |digits| group_from_right(digits, 3, 2))
}

pub fn format_inr(value: f64) -> String {
    if !value.is_finite() {
        return format_plain(value);
    }
    let grouped = format_indian(value.abs());
    if value < 0.0 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

fn group_digits(value: f64, group: impl Fn(&str) -> String) -> String {
    if !value.is_finite() {
        return format_plain(value);
    }

    let plain = value.abs().to_string();
    let (integer, fraction) = match plain.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_from_right(digits: &str, first: usize, rest: usize) -> String {
    if digits.len() <= first {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - first);
    let mut groups = vec![tail];
    let mut remaining = head;
    while remaining.len() > rest {
        let (h, t) = remaining.split_at(remaining.len() - rest);
        groups.push(t);
        remaining = h;
    }
    groups.push(remaining);
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_plain_drops_trailing_zero_fraction() {
        assert_eq!(format_plain(100.0), "100");
        assert_eq!(format_plain(12.5), "12.5");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1234567.0), "1,234,567");
        assert_eq!(format_grouped(-1234.5), "-1,234.5");
    }

    #[test]
    fn test_format_indian() {
        assert_eq!(format_indian(1000.0), "1,000");
        assert_eq!(format_indian(100000.0), "1,00,000");
        assert_eq!(format_indian(1234567.0), "12,34,567");
        assert_eq!(format_indian(123456789.0), "12,34,56,789");
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(250000.0), "₹2,50,000");
        assert_eq!(format_inr(-1500.0), "-₹1,500");
        assert_eq!(format_inr(f64::NAN), "NaN");
    }

    #[test]
    fn test_formatter_closure_matches_format() {
        let formatter = NumberFormat::Grouped.formatter();
        assert_eq!(formatter(12345.0), "12,345");
    }
}
