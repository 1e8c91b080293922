//! Persistent per-day workout history.
//!
//! The whole history lives under a single key of a [`KvStore`] as a JSON
//! array of `{"date": "YYYY-MM-DD", "completedSets": n}` and is rewritten
//! on every change. Storage problems never escape this module: a bad read
//! starts an empty history, a failed write is logged and the in-memory
//! copy stays authoritative.

mod streak;

pub use streak::{current_streak, longest_streak};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::storage::{read_json, KvStore};

pub const HISTORY_KEY: &str = "workout_history";

/// Completed sets on one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    pub date: NaiveDate,
    pub completed_sets: u32,
}

/// Local calendar date right now.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Per-day completed-set totals, at most one entry per date.
pub struct WorkoutHistory<S: KvStore> {
    store: S,
    days: Vec<WorkoutDay>,
}

impl<S: KvStore> WorkoutHistory<S> {
    /// Read the persisted history from `store`.
    ///
    /// Missing data gives an empty history. Unreadable or malformed data
    /// also gives an empty history, with a warning.
    pub fn load(store: S) -> Self {
        let days = match read_json::<Vec<WorkoutDay>, _>(&store, HISTORY_KEY) {
            Ok(Some(days)) => merge_duplicates(days),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load workout history, starting empty: {e}");
                Vec::new()
            }
        };
        Self { store, days }
    }

    pub fn days(&self) -> &[WorkoutDay] {
        &self.days
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Add `completed_sets` to today's record.
    pub fn record_completion(&mut self, completed_sets: u32) {
        self.record_completion_on(completed_sets, local_today());
    }

    /// Add `completed_sets` to the record for `date`, creating it if needed,
    /// then persist the whole history. Zero is ignored.
    pub fn record_completion_on(&mut self, completed_sets: u32, date: NaiveDate) {
        if completed_sets == 0 {
            return;
        }
        match self.days.iter_mut().find(|d| d.date == date) {
            Some(day) => day.completed_sets = day.completed_sets.saturating_add(completed_sets),
            None => self.days.push(WorkoutDay {
                date,
                completed_sets,
            }),
        }
        self.persist();
    }

    /// Today's record, or a zero record. Never inserts.
    pub fn today_stats(&self) -> WorkoutDay {
        self.stats_on(local_today())
    }

    pub fn stats_on(&self, date: NaiveDate) -> WorkoutDay {
        self.days
            .iter()
            .find(|d| d.date == date)
            .copied()
            .unwrap_or(WorkoutDay {
                date,
                completed_sets: 0,
            })
    }

    pub fn streak(&self) -> u32 {
        self.streak_as_of(local_today())
    }

    pub fn streak_as_of(&self, today: NaiveDate) -> u32 {
        current_streak(&self.days, today)
    }

    pub fn longest_streak(&self) -> u32 {
        longest_streak(&self.days)
    }

    pub fn total_sets(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.completed_sets)).sum()
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.days) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to encode workout history: {e}");
                return;
            }
        };
        if let Err(e) = self.store.kv_set(HISTORY_KEY, &json) {
            tracing::warn!("Failed to save workout history: {e}");
        }
    }
}

/// Collapse repeated dates into one record, keeping first-seen order.
fn merge_duplicates(days: Vec<WorkoutDay>) -> Vec<WorkoutDay> {
    let mut merged: Vec<WorkoutDay> = Vec::with_capacity(days.len());
    for day in days {
        match merged.iter_mut().find(|d| d.date == day.date) {
            Some(existing) => {
                tracing::warn!("Merging duplicate workout history entry for {}", day.date);
                existing.completed_sets = existing.completed_sets.saturating_add(day.completed_sets);
            }
            None => merged.push(day),
        }
    }
    merged
}
