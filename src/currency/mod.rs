//! Locale-aware rendering of jar amounts.
//!
//! Amounts are integers in the currency's smallest unit. VND has no minor
//! unit, so `1000000` renders as `1.000.000 VND` under `vi-VN`.

use jar_config::Config;

/// How amounts are rendered for one locale/currency pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub code: String,
    pub grouping_separator: char,
    pub decimal_separator: char,
    pub minor_units: u8,
}

impl CurrencyFormat {
    pub fn new(locale: &str, code: &str) -> Self {
        let (grouping_separator, decimal_separator) = separators_for(locale);
        let code = code.trim().to_uppercase();
        Self {
            minor_units: minor_units_for(&code),
            code,
            grouping_separator,
            decimal_separator,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.locale, &config.currency)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("vi-VN", "VND")
    }
}

fn separators_for(locale: &str) -> (char, char) {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "vi" | "de" | "id" | "es" | "it" | "pt" => ('.', ','),
        _ => (',', '.'),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "VND" | "JPY" | "KRW" | "IDR" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats an amount given in minor units, e.g. `-1.250.000 VND` or
/// `1,500.50 USD`.
pub fn format_amount(amount: impl Into<i128>, format: &CurrencyFormat) -> String {
    let amount = amount.into();
    let magnitude = amount.unsigned_abs();
    let scale = 10u128.pow(u32::from(format.minor_units));
    let whole = group_digits(&(magnitude / scale).to_string(), format.grouping_separator);
    let mut body = if format.minor_units == 0 {
        whole
    } else {
        format!(
            "{whole}{}{:0width$}",
            format.decimal_separator,
            magnitude % scale,
            width = usize::from(format.minor_units)
        )
    };
    if amount < 0 {
        body.insert(0, '-');
    }
    if format.code.is_empty() {
        body
    } else {
        format!("{body} {}", format.code)
    }
}

pub fn format_percent(percent: impl Into<u64>) -> String {
    format!("{}%", percent.into())
}

/// Parses user input such as `2.000.000`, `2000000 VND` or `-1,500.50` into
/// minor units. Returns `None` for anything that is not a plain amount.
pub fn parse_amount(text: &str, format: &CurrencyFormat) -> Option<i128> {
    let mut trimmed = text.trim();
    if let Some(stripped) = trimmed.strip_suffix(format.code.as_str()) {
        trimmed = stripped.trim_end();
    }
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let cleaned: String = unsigned
        .chars()
        .filter(|ch| *ch != format.grouping_separator)
        .collect();
    let (whole, fraction) = match cleaned.split_once(format.decimal_separator) {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned.as_str(), ""),
    };
    let digits_only = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) {
        return None;
    }
    if fraction.len() > usize::from(format.minor_units) {
        return None;
    }
    let scale = 10i128.pow(u32::from(format.minor_units));
    let whole: i128 = whole.parse().ok()?;
    let fraction_value: i128 = if fraction.is_empty() {
        0
    } else {
        let padding = u32::from(format.minor_units) - fraction.len() as u32;
        fraction.parse::<i128>().ok()? * 10i128.pow(padding)
    };
    let value = whole.checked_mul(scale)?.checked_add(fraction_value)?;
    Some(if negative { -value } else { value })
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_digits("1", '.'), "1");
        assert_eq!(group_digits("1000", '.'), "1.000");
        assert_eq!(group_digits("123456789", ','), "123,456,789");
    }

    #[test]
    fn locale_picks_separators() {
        assert_eq!(separators_for("vi-VN"), ('.', ','));
        assert_eq!(separators_for("en_US"), (',', '.'));
    }
}
