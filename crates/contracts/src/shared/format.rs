//! Утилиты форматирования денег, чисел и дат.
//!
//! Все функции дают стабильный результат, не зависящий от локали браузера
//! или сервера.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::projections::p900_weekly_accounting::week::WeekBounds;

/// Валюта отображения сумм
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Rub,
    Try,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Try => "TRY",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Rub => "₽",
            Currency::Try => "TL",
        }
    }

    fn group_separator(&self) -> char {
        match self {
            Currency::Rub => ' ',
            Currency::Try => '.',
        }
    }
}

/// Группирует разряды целого неотрицательного числа
fn group_digits(value: u64, separator: char) -> String {
    let s = value.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Денежная сумма без копеек: `12345.0` → `"12 345 ₽"` / `"12.345 TL"`
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let grouped = group_digits(rounded.abs() as u64, currency.group_separator());
    format!("{}{} {}", sign, grouped, currency.symbol())
}

/// Целое число с разделителем тысяч (пробел)
pub fn format_number(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{}{}", sign, group_digits(value.unsigned_abs(), ' '))
}

/// Доля в процентах с одним знаком после запятой: `0.125` → `"12,5 %"`
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1} %", ratio * 100.0).replace('.', ",")
}

/// DD.MM.YYYY
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// DD.MM.YYYY HH:MM
pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
}

/// Диапазон недели: `"06.01 – 12.01.2025"`
pub fn format_week_range(bounds: &WeekBounds) -> String {
    format!(
        "{} – {}",
        bounds.monday.format("%d.%m"),
        bounds.sunday.format("%d.%m.%Y")
    )
}

/// Format ISO date string to DD.MM.YYYY format
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15.03.2024"
pub fn format_iso_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}.{}.{}", day, month, year);
        }
    }
    date_str.to_string()
}

/// Format ISO datetime string to DD.MM.YYYY HH:MM format
/// Example: "2024-03-15T14:02:26.123Z" -> "15.03.2024 14:02"
pub fn format_iso_datetime(datetime_str: &str) -> String {
    if let Some((date_part, time_part)) = datetime_str.split_once('T') {
        if let Some((year, rest)) = date_part.split_once('-') {
            if let Some((month, day)) = rest.split_once('-') {
                let hh_mm: String = time_part.chars().take(5).collect();
                return format!("{}.{}.{} {}", day, month, year, hh_mm);
            }
        }
    }
    datetime_str.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_rub() {
        assert_eq!(format_currency(12345.0, Currency::Rub), "12 345 ₽");
        assert_eq!(format_currency(0.0, Currency::Rub), "0 ₽");
        assert_eq!(format_currency(999.4, Currency::Rub), "999 ₽");
        assert_eq!(format_currency(1234567.5, Currency::Rub), "1 234 568 ₽");
    }

    #[test]
    fn test_format_currency_try() {
        assert_eq!(format_currency(12345.0, Currency::Try), "12.345 TL");
        assert_eq!(format_currency(1000000.0, Currency::Try), "1.000.000 TL");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-1500.0, Currency::Rub), "-1 500 ₽");
        assert_eq!(format_currency(-0.2, Currency::Try), "0 TL");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1 000");
        assert_eq!(format_number(-1234567), "-1 234 567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.125), "12,5 %");
        assert_eq!(format_percent(0.0), "0,0 %");
    }

    #[test]
    fn test_format_dates() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(format_date(d), "06.01.2025");
        let dt = d.and_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_datetime(dt), "06.01.2025 09:05");
    }

    #[test]
    fn test_format_week_range() {
        let bounds = WeekBounds::containing(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(format_week_range(&bounds), "30.12 – 05.01.2025");
    }

    #[test]
    fn test_format_iso_strings() {
        assert_eq!(format_iso_date("2024-03-15"), "15.03.2024");
        assert_eq!(format_iso_date("2024-03-15T14:02:26.123Z"), "15.03.2024");
        assert_eq!(format_iso_datetime("2024-03-15T14:02:26.123Z"), "15.03.2024 14:02");
        assert_eq!(format_iso_date("invalid"), "invalid");
        assert_eq!(format_iso_datetime("invalid"), "invalid");
    }
}
