use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Intensity;
use crate::error::ValidationError;
use crate::history::WorkoutDay;

/// A calendar month, always valid once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMonthKey")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawMonthKey {
    year: i32,
    month: u32,
}

impl TryFrom<RawMonthKey> for MonthKey {
    type Error = ValidationError;

    fn try_from(raw: RawMonthKey) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month)
    }
}

impl MonthKey {
    /// # Errors
    /// Returns `ValidationError::InvalidValue` unless `month` is 1-12 and the
    /// year is within chrono's date range.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ValidationError::InvalidValue {
                field: "month".to_string(),
                message: format!("{year}-{month:02} is not a calendar month"),
            });
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Validated in the constructors.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The month before this one, or `None` at the start of chrono's range.
    pub fn previous(&self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year.checked_sub(1)?, 12).ok()
        } else {
            Self::new(self.year, self.month - 1).ok()
        }
    }

    /// The month after this one, or `None` at the end of chrono's range.
    pub fn next(&self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year.checked_add(1)?, 1).ok()
        } else {
            Self::new(self.year, self.month + 1).ok()
        }
    }

    /// Every date of the month in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.month;
        std::iter::successors(Some(self.first_day()), |d| d.succ_opt())
            .take_while(move |d| d.month() == month)
    }

    pub fn days_in_month(&self) -> u32 {
        u32::try_from(self.dates().count()).unwrap_or(0)
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub completed_sets: u32,
    pub intensity: Intensity,
}

/// A month of the workout history laid out for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub month: MonthKey,
    /// Empty cells before the 1st in a Sunday-first week.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthView {
    pub fn build(history: &[WorkoutDay], month: MonthKey) -> Self {
        let by_date: HashMap<NaiveDate, u32> = history
            .iter()
            .map(|d| (d.date, d.completed_sets))
            .collect();

        let first = month.first_day();
        let days = month
            .dates()
            .map(|date| {
                let completed_sets = by_date.get(&date).copied().unwrap_or(0);
                CalendarDay {
                    date,
                    completed_sets,
                    intensity: Intensity::from_sets(completed_sets),
                }
            })
            .collect();

        Self {
            month,
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        }
    }

    /// # Errors
    /// Returns an error for an invalid year/month pair.
    pub fn for_month(
        history: &[WorkoutDay],
        year: i32,
        month: u32,
    ) -> Result<Self, ValidationError> {
        Ok(Self::build(history, MonthKey::new(year, month)?))
    }

    pub fn total_sets(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.completed_sets)).sum()
    }

    pub fn active_days(&self) -> usize {
        self.days.iter().filter(|d| d.completed_sets > 0).count()
    }

    /// Rows of seven optional cells, Sunday first, padded at both ends.
    pub fn weeks(&self) -> Vec<[Option<&CalendarDay>; 7]> {
        let mut cells: Vec<Option<&CalendarDay>> = vec![None; self.leading_blanks as usize];
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells
            .chunks(7)
            .map(|chunk| {
                let mut week = [None; 7];
                week.copy_from_slice(chunk);
                week
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_key_rejects_invalid_month() {
        assert!(MonthKey::new(2026, 0).is_err());
        assert!(MonthKey::new(2026, 13).is_err());
        assert!(MonthKey::new(2026, 12).is_ok());
    }

    #[test]
    fn navigation_wraps_years() {
        let jan = MonthKey::new(2026, 1).unwrap();
        assert_eq!(jan.previous(), Some(MonthKey::new(2025, 12).unwrap()));
        assert_eq!(jan.previous().and_then(|m| m.next()), Some(jan));
        assert_eq!(
            MonthKey::new(2026, 12).unwrap().next(),
            Some(MonthKey::new(2027, 1).unwrap())
        );
    }

    #[test]
    fn navigation_stops_at_date_range_limits() {
        let last = MonthKey::containing(NaiveDate::MAX);
        assert_eq!(last.month(), 12);
        assert!(last.next().is_none());
        assert_eq!(last.days_in_month(), 31);
        assert_eq!(last.previous().map(|m| m.month()), Some(11));

        let first = MonthKey::containing(NaiveDate::MIN);
        assert_eq!(first.month(), 1);
        assert!(first.previous().is_none());
        assert_eq!(first.days_in_month(), 31);
        assert!(first.next().is_some());
    }

    #[test]
    fn last_month_builds_full_view() {
        let last = MonthKey::containing(NaiveDate::MAX);
        let view = MonthView::build(&[], last);
        assert_eq!(view.days.len(), 31);
        assert_eq!(view.days.last().map(|d| d.date), Some(NaiveDate::MAX));
    }

    #[test]
    fn deserializing_rejects_invalid_month() {
        let key: MonthKey = serde_json::from_str(r#"{"year":2026,"month":2}"#).unwrap();
        assert_eq!(key, MonthKey::new(2026, 2).unwrap());
        assert!(serde_json::from_str::<MonthKey>(r#"{"year":2026,"month":13}"#).is_err());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(MonthKey::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthKey::new(2026, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthKey::new(2026, 4).unwrap().days_in_month(), 30);
        assert_eq!(MonthKey::new(2026, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn build_places_history_on_days() {
        let history = [
            WorkoutDay {
                date: date(2026, 3, 2),
                completed_sets: 3,
            },
            WorkoutDay {
                date: date(2026, 3, 31),
                completed_sets: 8,
            },
            WorkoutDay {
                date: date(2026, 4, 1),
                completed_sets: 1,
            },
        ];
        let view = MonthView::for_month(&history, 2026, 3).unwrap();

        // 2026-03-01 is a Sunday.
        assert_eq!(view.leading_blanks, 0);
        assert_eq!(view.days.len(), 31);
        assert_eq!(view.days[1].completed_sets, 3);
        assert_eq!(view.days[1].intensity, Intensity::Moderate);
        assert_eq!(view.days[30].intensity, Intensity::Peak);
        assert_eq!(view.total_sets(), 11);
        assert_eq!(view.active_days(), 2);
    }

    #[test]
    fn weeks_are_padded() {
        // 2026-05-01 is a Friday.
        let view = MonthView::for_month(&[], 2026, 5).unwrap();
        assert_eq!(view.leading_blanks, 5);
        let weeks = view.weeks();
        assert_eq!(weeks.len(), 6);
        assert!(weeks[0][4].is_none());
        assert_eq!(weeks[0][5].map(|d| d.date), Some(date(2026, 5, 1)));
        assert!(weeks.iter().all(|w| w.len() == 7));
    }
}
