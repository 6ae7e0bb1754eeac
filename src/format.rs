//! Human-readable number formatting for action text and CLI output

/// Format a number with thousands separators and no decimals: `1234567.4` → `"1,234,567"`
pub fn format_grouped(n: f64) -> String {
    let rounded = n.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Rupee amount grouped by thousands: `150000.0` → `"₹150,000"`
pub fn format_rupees(n: f64) -> String {
    format!("₹{}", format_grouped(n))
}

/// Amount in lakhs with one decimal: `5_760_000.0` → `"₹57.6L"`
pub fn format_lakhs(n: f64) -> String {
    format!("₹{:.1}L", n / 100_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1234567.4), "1,234,567");
        assert_eq!(format_grouped(-45000.0), "-45,000");
        assert_eq!(format_grouped(99999.6), "100,000");
    }

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(150000.0), "₹150,000");
        assert_eq!(format_rupees(-2500.0), "₹-2,500");
    }

    #[test]
    fn test_format_lakhs() {
        assert_eq!(format_lakhs(5_760_000.0), "₹57.6L");
        assert_eq!(format_lakhs(0.0), "₹0.0L");
    }
}
