use chrono::{NaiveDate, TimeZone, Utc};

/// Dataset and label date format.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Two-significant-digit SI formatting with currency-style suffixes:
/// `G` becomes `B` (billions) and `k` becomes `K`.
pub fn format_abbrev(value: f64) -> String {
    let s = format_si(value);
    match s.as_bytes().last() {
        Some(b'G') => format!("{}B", &s[..s.len() - 1]),
        Some(b'k') => format!("{}K", &s[..s.len() - 1]),
        _ => s,
    }
}

fn format_si(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0.0".to_string();
    }

    let neg = value < 0.0;
    let v = value.abs();

    // Exponent after rounding to two significant digits, so 999.5 lands in
    // the next prefix as "1.0k" rather than "1000".
    let mut exp = v.log10().floor() as i32;
    if (v / 10f64.powi(exp - 1)).round() >= 100.0 {
        exp += 1;
    }

    let prefix_exp = (exp.div_euclid(3) * 3).clamp(-24, 24);
    let scaled = v / 10f64.powi(prefix_exp);

    let int_digits = exp - prefix_exp + 1;
    let decimals = (2 - int_digits).max(0) as usize;

    let suffix = SI_PREFIXES[((prefix_exp + 24) / 3) as usize];
    let sign = if neg { "-" } else { "" };

    format!("{sign}{scaled:.decimals$}{suffix}")
}

/// Parse a `DD/MM/YYYY` date into UTC-midnight milliseconds.
pub fn parse_date(input: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(input, DATE_FORMAT).ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

pub fn format_date(ts_ms: i64) -> String {
    Utc.timestamp_millis_opt(ts_ms)
        .single()
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn format_year(ts_ms: i64) -> String {
    Utc.timestamp_millis_opt(ts_ms)
        .single()
        .map(|dt| dt.format("%Y").to_string())
        .unwrap_or_default()
}

pub fn year_start_ms(year: i32) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(year, 1, 1)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_with_currency_suffixes() {
        assert_eq!(format_abbrev(1_500.0), "1.5K");
        assert_eq!(format_abbrev(2_300_000_000.0), "2.3B");
        assert_eq!(format_abbrev(950.0), "950");
    }

    #[test]
    fn abbreviation_rounds_into_next_prefix() {
        assert_eq!(format_abbrev(999.5), "1.0K");
        assert_eq!(format_abbrev(1_000.0), "1.0K");
    }

    #[test]
    fn abbreviates_small_and_signed_values() {
        assert_eq!(format_abbrev(0.005), "5.0m");
        assert_eq!(format_abbrev(-42_000_000.0), "-42M");
        assert_eq!(format_abbrev(0.0), "0.0");
    }

    #[test]
    fn dates_round_trip() {
        for input in ["12/05/2013", "31/10/2017", "01/01/2016", "29/02/2016"] {
            let ts = parse_date(input).unwrap();
            assert_eq!(format_date(ts), input);
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2013-05-12"), None);
        assert_eq!(parse_date("32/01/2014"), None);
    }

    #[test]
    fn year_marks_format_back() {
        let ts = year_start_ms(2015).unwrap();
        assert_eq!(format_year(ts), "2015");
        assert_eq!(format_date(ts), "01/01/2015");
    }
}
