//! Utility functions and helpers

use rust_decimal::Decimal;

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

/// Format a monetary amount with two decimals and thousands separators
pub fn format_amount(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    match fixed.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", format_number(int_part), frac),
        None => format_number(fixed),
    }
}

/// Amount with its currency code, or a dash when absent
pub fn format_money(amount: Option<Decimal>, currency: &str) -> String {
    match amount {
        Some(a) if currency.is_empty() => format_amount(a),
        Some(a) => format!("{} {}", format_amount(a), currency),
        None => "-".to_string(),
    }
}

/// Escape text for inclusion in HTML content and attribute values
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Text shown in a table cell, a dash for blanks
pub fn cell(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        escape_html(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-1234), "-1,234");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(123456789, 2)), "1,234,567.89");
        assert_eq!(format_amount(Decimal::new(15, 1)), "1.50");
        assert_eq!(format_amount(Decimal::new(-250000, 0)), "-250,000.00");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Some(Decimal::new(1500, 0)), "INR"), "1,500.00 INR");
        assert_eq!(format_money(None, "INR"), "-");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(cell("  "), "-");
        assert_eq!(cell("A&B"), "A&amp;B");
    }
}
