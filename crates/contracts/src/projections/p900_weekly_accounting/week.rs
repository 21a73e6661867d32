//! Недельные интервалы для бухгалтерии продавцов.
//!
//! Неделя всегда начинается в понедельник и заканчивается в воскресенье.
//! Идентификатор недели: дата понедельника в формате `YYYY-MM-DD`.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

pub const WEEK_ID_FORMAT: &str = "%Y-%m-%d";

/// Понедельник и воскресенье одной недели
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekBounds {
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
}

impl WeekBounds {
    /// Неделя, содержащая указанную дату
    pub fn containing(date: NaiveDate) -> Self {
        // number_from_monday: понедельник = 1, воскресенье = 7
        let offset = date.weekday().number_from_monday() as i64 - 1;
        let monday = date - Duration::days(offset);
        Self {
            monday,
            sunday: monday + Duration::days(6),
        }
    }

    pub fn week_id(&self) -> String {
        week_id(self.monday)
    }

    /// Последняя секунда недели: воскресенье 23:59:59
    pub fn end_of_week(&self) -> NaiveDateTime {
        self.sunday.and_time(last_second_of_day())
    }

    /// Начало недели: понедельник 00:00:00
    pub fn start_of_week(&self) -> NaiveDateTime {
        self.monday.and_time(NaiveTime::MIN)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday && date <= self.sunday
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.monday - Duration::days(7))
    }

    pub fn next(&self) -> Self {
        Self::containing(self.monday + Duration::days(7))
    }
}

fn last_second_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Границы недели (понедельник–воскресенье), содержащей дату
pub fn week_bounds(date: NaiveDate) -> WeekBounds {
    WeekBounds::containing(date)
}

/// Идентификатор недели: дата понедельника `YYYY-MM-DD`
pub fn week_id(monday: NaiveDate) -> String {
    monday.format(WEEK_ID_FORMAT).to_string()
}

/// Разбор идентификатора недели. Допускается только понедельник.
pub fn parse_week_id(value: &str) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(value.trim(), WEEK_ID_FORMAT)
        .map_err(|e| format!("Invalid week id '{}': {}", value, e))?;
    if date.weekday() != Weekday::Mon {
        return Err(format!("Invalid week id '{}': not a Monday", value));
    }
    Ok(date)
}

/// Недели месяца: от первого понедельника не позже 1-го числа,
/// с шагом 7 дней, пока понедельник не выйдет за последний день месяца.
/// Крайние недели могут захватывать соседние месяцы.
pub fn weeks_of_month(year: i32, month: u32) -> Vec<WeekBounds> {
    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let last_day = last_day_of_month(first_day);

    let mut weeks = Vec::new();
    let mut current = WeekBounds::containing(first_day);
    while current.monday <= last_day {
        weeks.push(current);
        current = current.next();
    }
    weeks
}

fn last_day_of_month(first_day: NaiveDate) -> NaiveDate {
    let (y, m) = if first_day.month() == 12 {
        (first_day.year() + 1, 1)
    } else {
        (first_day.year(), first_day.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .map(|d| d - Duration::days(1))
        .unwrap_or(first_day)
}

/// Неделя незавершена, если «сейчас» не позже воскресенья 23:59:59
pub fn is_week_incomplete(sunday: NaiveDate, now: NaiveDateTime) -> bool {
    now <= sunday.and_time(last_second_of_day())
}

/// Последняя полностью завершённая неделя относительно `today`
pub fn previous_complete_week(today: NaiveDate) -> WeekBounds {
    WeekBounds::containing(today).previous()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_bounds_every_weekday() {
        // 2025-01-06: понедельник
        for offset in 0..7 {
            let d = date(2025, 1, 6) + Duration::days(offset);
            let b = week_bounds(d);
            assert_eq!(b.monday, date(2025, 1, 6), "day {}", d);
            assert_eq!(b.sunday, date(2025, 1, 12), "day {}", d);
            assert_eq!(b.monday.weekday(), Weekday::Mon);
            assert_eq!(b.sunday.weekday(), Weekday::Sun);
        }
    }

    #[test]
    fn test_sunday_belongs_to_previous_monday() {
        let b = week_bounds(date(2024, 9, 1)); // воскресенье
        assert_eq!(b.monday, date(2024, 8, 26));
        assert_eq!(b.sunday, date(2024, 9, 1));
    }

    #[test]
    fn test_week_bounds_over_a_range_of_dates() {
        let mut d = date(2023, 12, 1);
        while d < date(2025, 3, 1) {
            let b = week_bounds(d);
            assert!(b.contains(d));
            assert_eq!(b.monday.weekday(), Weekday::Mon);
            assert_eq!(b.sunday - b.monday, Duration::days(6));
            assert_eq!(parse_week_id(&week_id(b.monday)).unwrap(), b.monday);
            d = d + Duration::days(1);
        }
    }

    #[test]
    fn test_week_id_format() {
        assert_eq!(week_id(date(2025, 1, 6)), "2025-01-06");
        assert_eq!(WeekBounds::containing(date(2025, 1, 8)).week_id(), "2025-01-06");
    }

    #[test]
    fn test_parse_week_id_rejects_non_monday_and_garbage() {
        assert!(parse_week_id("2025-01-07").is_err());
        assert!(parse_week_id("2025-13-01").is_err());
        assert!(parse_week_id("not-a-date").is_err());
        assert_eq!(parse_week_id(" 2025-01-06 ").unwrap(), date(2025, 1, 6));
    }

    #[test]
    fn test_weeks_of_month_properties() {
        for year in [2023, 2024, 2025] {
            for month in 1..=12 {
                let weeks = weeks_of_month(year, month);
                let first = date(year, month, 1);
                assert!(!weeks.is_empty());
                assert!(weeks[0].monday <= first);
                assert!(weeks[0].monday > first - Duration::days(7));
                for pair in weeks.windows(2) {
                    assert_eq!(pair[1].monday - pair[0].monday, Duration::days(7));
                }
                let last = last_day_of_month(first);
                assert!(weeks.last().unwrap().monday <= last);
                assert!(weeks.last().unwrap().sunday >= last);
            }
        }
    }

    #[test]
    fn test_weeks_of_month_overlap_is_kept() {
        // Март 2025 начинается в субботу
        let weeks = weeks_of_month(2025, 3);
        assert_eq!(weeks[0].monday, date(2025, 2, 24));
        assert_eq!(weeks.last().unwrap().monday, date(2025, 3, 31));
        assert_eq!(weeks.len(), 6);
    }

    #[test]
    fn test_weeks_of_month_first_is_monday() {
        // Сентябрь 2025 начинается в понедельник
        let weeks = weeks_of_month(2025, 9);
        assert_eq!(weeks[0].monday, date(2025, 9, 1));
        assert_eq!(weeks.len(), 5);
    }

    #[test]
    fn test_weeks_of_invalid_month() {
        assert!(weeks_of_month(2025, 13).is_empty());
    }

    #[test]
    fn test_is_week_incomplete_boundary() {
        let sunday = date(2025, 1, 12);
        let boundary = sunday.and_hms_opt(23, 59, 59).unwrap();
        assert!(is_week_incomplete(sunday, boundary));
        assert!(is_week_incomplete(sunday, boundary - Duration::seconds(1)));
        assert!(!is_week_incomplete(sunday, boundary + Duration::seconds(1)));
        assert!(is_week_incomplete(sunday, date(2025, 1, 6).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_previous_complete_week() {
        let w = previous_complete_week(date(2025, 1, 8));
        assert_eq!(w.monday, date(2024, 12, 30));
        assert_eq!(w.sunday, date(2025, 1, 5));
        let w = previous_complete_week(date(2025, 1, 6));
        assert_eq!(w.monday, date(2024, 12, 30));
    }

    #[test]
    fn test_start_and_end_of_week() {
        let b = WeekBounds::containing(date(2025, 1, 8));
        assert_eq!(b.start_of_week(), date(2025, 1, 6).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(b.end_of_week(), date(2025, 1, 12).and_hms_opt(23, 59, 59).unwrap());
    }
}
