/// Форматирует число с разделителями тысяч (запятыми)
///
/// # Примеры
/// ```ignore
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Денежная сумма с двумя знаками: `$1,234.50`
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

/// Количество месяцев с одним знаком после запятой, как в форме приёма платежа
pub fn format_periods(periods: f64) -> String {
    format!("{:.1}", periods)
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(15.0), "$15.00");
        assert_eq!(format_money(45231.0), "$45,231.00");
        assert_eq!(format_money(1234.567), "$1,234.57");
        assert_eq!(format_money(-2.5), "-$2.50");
    }

    #[test]
    fn test_format_periods() {
        assert_eq!(format_periods(1.5), "1.5");
        assert_eq!(format_periods(12.0), "12.0");
        assert_eq!(format_periods(0.333), "0.3");
    }
}
