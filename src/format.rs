use crate::invoice::parse_instant;

/// Brazilian real, pt-BR grouping: `R$ 1.234,56`
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}R$ {},{:02}",
        sign,
        format_grouped_int(cents / 100, '.'),
        cents % 100
    )
}

fn format_grouped_int(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// `dd/mm/yyyy`. Text that is not a date is returned unchanged.
pub fn format_date(raw: &str) -> String {
    match parse_instant(raw) {
        Some(instant) => instant.format("%d/%m/%Y").to_string(),
        None => raw.to_string(),
    }
}
