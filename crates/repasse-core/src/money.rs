/// Format an amount as Brazilian Real: `R$ 1.234.567,89`.
pub fn format_brl(value: f64) -> String {
    if !value.is_finite() {
        return "R$ -".to_string();
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(0.5), "R$ 0,50");
        assert_eq!(format_brl(12.346), "R$ 12,35");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(999999.99), "R$ 999.999,99");
        assert_eq!(format_brl(1234567.0), "R$ 1.234.567,00");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_brl(-1500.0), "-R$ 1.500,00");
        assert_eq!(format_brl(-0.001), "R$ 0,00");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_brl(f64::NAN), "R$ -");
    }
}
