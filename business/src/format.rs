//! pt-BR display formatting.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Format `value` as Brazilian reais: `R$ 1.234,56`.
pub fn brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{sign}R$ {},{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(mut units: u64) -> String {
    let mut groups = Vec::new();
    loop {
        let group = units % 1000;
        units /= 1000;
        if units == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{group:03}"));
    }
    groups.reverse();
    groups.join(".")
}

/// Parse a user-typed amount. Accepts `99.9`, `99,90`, `1.234,56` and `R$ 1.234,56`.
pub fn parse_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim().trim_start_matches("R$").trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalised = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalised.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Timestamp in the viewer's local time zone.
pub fn local_timestamp(at: &DateTime<Utc>) -> String {
    timestamp_in(at, &Local)
}

pub fn timestamp_in<Tz: TimeZone>(at: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(zone).format("%d/%m/%Y %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn brl_formats_cents_and_thousands() {
        assert_eq!(brl(99.9), "R$ 99,90");
        assert_eq!(brl(1234.56), "R$ 1.234,56");
        assert_eq!(brl(0.0), "R$ 0,00");
        assert_eq!(brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(brl(1005.05), "R$ 1.005,05");
        assert_eq!(brl(-5.0), "-R$ 5,00");
    }

    #[test]
    fn parse_decimal_accepts_both_separators() {
        assert_eq!(parse_decimal("99.9"), Some(99.9));
        assert_eq!(parse_decimal("99,90"), Some(99.9));
        assert_eq!(parse_decimal("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal(" 12 "), Some(12.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn timestamps_render_in_the_given_zone() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let sao_paulo = FixedOffset::west_opt(3 * 3600).unwrap();

        assert_eq!(timestamp_in(&at, &sao_paulo), "01/05/2024 09:30:00");
        assert_eq!(timestamp_in(&at, &Utc), "01/05/2024 12:30:00");
    }
}
