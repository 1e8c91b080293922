//! Calendar heatmap data.
//!
//! Turns the flat workout history into a month grid that a front end can
//! draw directly: one cell per day, each tagged with an intensity bucket.

mod intensity;
mod month;

pub use intensity::Intensity;
pub use month::{CalendarDay, MonthKey, MonthView};
