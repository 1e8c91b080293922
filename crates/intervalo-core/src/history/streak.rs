use chrono::{Days, NaiveDate};

use super::WorkoutDay;

/// Consecutive active days ending today or yesterday.
///
/// Days are walked newest first. The newest active day must be `today` or
/// the day before; every following day must be exactly one day earlier
/// than the last accepted one. Zero-set days count as absent, so they end
/// the run like any other gap. Days after `today` are ignored.
pub fn current_streak(days: &[WorkoutDay], today: NaiveDate) -> u32 {
    let mut sorted: Vec<&WorkoutDay> = days
        .iter()
        .filter(|d| d.completed_sets > 0 && d.date <= today)
        .collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let Some(yesterday) = today.checked_sub_days(Days::new(1)) else {
        return 0;
    };

    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;
    for day in sorted {
        let accepted = match expected {
            None => day.date == today || day.date == yesterday,
            Some(next) => day.date == next,
        };
        if !accepted {
            break;
        }
        streak += 1;
        match day.date.checked_sub_days(Days::new(1)) {
            Some(prev) => expected = Some(prev),
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive active days anywhere in the history.
pub fn longest_streak(days: &[WorkoutDay]) -> u32 {
    let mut active: Vec<NaiveDate> = days
        .iter()
        .filter(|d| d.completed_sets > 0)
        .map(|d| d.date)
        .collect();
    active.sort();
    active.dedup();

    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for date in active {
        run = match prev.and_then(|p| p.checked_add_days(Days::new(1))) {
            Some(next) if next == date => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }
    best
}
