use crate::config::CurrencyConfig;
use chrono::{DateTime, Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Separators and symbol placement for one locale.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LocaleRules {
    home_currency: &'static str,
    symbol: &'static str,
    group: char,
    symbol_after: bool,
    symbol_gap: bool,
}

fn locale_rules(locale: &str) -> LocaleRules {
    match locale.to_ascii_lowercase().as_str() {
        "es-co" => LocaleRules {
            home_currency: "COP",
            symbol: "$",
            group: '.',
            symbol_after: false,
            symbol_gap: true,
        },
        "en-us" => LocaleRules {
            home_currency: "USD",
            symbol: "$",
            group: ',',
            symbol_after: false,
            symbol_gap: false,
        },
        "es-es" => LocaleRules {
            home_currency: "EUR",
            symbol: "€",
            group: '.',
            symbol_after: true,
            symbol_gap: true,
        },
        _ => LocaleRules {
            home_currency: "",
            symbol: "",
            group: ',',
            symbol_after: false,
            symbol_gap: true,
        },
    }
}

/// Formats amounts as whole currency units for a fixed locale/currency pair.
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    currency: String,
    rules: LocaleRules,
}

impl CurrencyFormatter {
    pub fn new(config: &CurrencyConfig) -> Self {
        Self {
            currency: config.currency.to_ascii_uppercase(),
            rules: locale_rules(&config.locale),
        }
    }

    /// Amounts are `f64` by the time they get here, so the only values that
    /// are not numbers are NaN and the infinities; those are printed as is.
    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return amount.to_string();
        }

        let rounded = amount.round();
        let digits = group_digits(rounded.abs(), self.rules.group);
        let symbol = if self.currency == self.rules.home_currency {
            self.rules.symbol
        } else {
            self.currency.as_str()
        };
        let gap = if self.rules.symbol_gap { " " } else { "" };
        let sign = if rounded < 0.0 { "-" } else { "" };

        if self.rules.symbol_after {
            format!("{sign}{digits}{gap}{symbol}")
        } else {
            format!("{sign}{symbol}{gap}{digits}")
        }
    }
}

fn group_digits(whole: f64, separator: char) -> String {
    let raw = format!("{whole:.0}");
    let len = raw.len();
    let mut out = String::with_capacity(len + len / 3);
    for (index, digit) in raw.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}

/// Turns a backend month code (`"2025-8"`) into a label (`"Ago 2025"`).
///
/// Out-of-range or unreadable months clamp into `1..=12`; a missing year is
/// left out.
pub fn format_month(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let mut parts = raw.split('-');
    let year = parts
        .next()
        .and_then(|part| part.trim().parse::<i64>().ok())
        .filter(|year| *year != 0);
    let month = parts
        .next()
        .and_then(|part| part.trim().parse::<i64>().ok())
        .filter(|month| *month != 0)
        .unwrap_or(1)
        .clamp(1, 12);

    let name = MONTHS[(month - 1) as usize];
    match year {
        Some(year) => format!("{name} {year}"),
        None => name.to_string(),
    }
}

/// Labels a series date (`"2025-08-14"` or RFC 3339) as `"14 Ago 2025"`.
///
/// Dates in any other form are shown as received.
pub fn format_day(raw: &str) -> String {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));

    match date {
        Some(date) => format!(
            "{} {} {}",
            date.day(),
            MONTHS[date.month0() as usize],
            date.year()
        ),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(currency: &str, locale: &str) -> CurrencyFormatter {
        CurrencyFormatter::new(&CurrencyConfig {
            currency: currency.to_string(),
            locale: locale.to_string(),
        })
    }

    #[test]
    fn month_labels() {
        assert_eq!(format_month("2025-8"), "Ago 2025");
        assert_eq!(format_month("2025-1"), "Ene 2025");
        assert_eq!(format_month("2025-12"), "Dic 2025");
    }

    #[test]
    fn month_out_of_range_clamps() {
        assert_eq!(format_month("2025-13"), "Dic 2025");
        assert_eq!(format_month("2025-0"), "Ene 2025");
        assert_eq!(format_month("2025--4"), "Ene 2025");
        assert_eq!(format_month("2025"), "Ene 2025");
    }

    #[test]
    fn month_without_year() {
        assert_eq!(format_month(""), "");
        assert_eq!(format_month("   "), "");
        assert_eq!(format_month("x-3"), "Mar");
    }

    #[test]
    fn colombian_pesos() {
        let cop = formatter("COP", "es-CO");
        assert_eq!(cop.format(1_500_000.0), "$ 1.500.000");
        assert_eq!(cop.format(750_000.0), "$ 750.000");
        assert_eq!(cop.format(999.5), "$ 1.000");
        assert_eq!(cop.format(0.0), "$ 0");
        assert_eq!(cop.format(-2500.0), "-$ 2.500");
    }

    #[test]
    fn foreign_currency_uses_iso_code() {
        assert_eq!(formatter("COP", "en-US").format(1_500_000.0), "COP 1,500,000");
        assert_eq!(formatter("USD", "en-US").format(1234.4), "$1,234");
        assert_eq!(formatter("EUR", "es-ES").format(1234.0), "1.234 €");
        assert_eq!(formatter("cop", "fr-FR").format(12.0), "COP 12");
    }

    #[test]
    fn non_finite_amounts_pass_through() {
        let cop = formatter("COP", "es-CO");
        assert_eq!(cop.format(f64::NAN), "NaN");
        assert_eq!(cop.format(f64::INFINITY), "inf");
        assert_eq!(cop.format(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn day_labels() {
        assert_eq!(format_day("2025-08-14"), "14 Ago 2025");
        assert_eq!(format_day("2025-02-01T10:00:00Z"), "1 Feb 2025");
        assert_eq!(format_day("ayer"), "ayer");
        assert_eq!(format_day(""), "");
    }
}
