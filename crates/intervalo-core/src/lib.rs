//! # Intervalo Core Library
//!
//! Business logic for the Intervalo interval-training timer. Every
//! operation is available through the standalone CLI; any other front end
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: second-granularity session/break state machine; the
//!   caller invokes `tick()` once per second while it runs
//! - **Workout History**: per-day completed-set totals with streaks, kept in
//!   a key-value store
//! - **Calendar**: month heatmap data derived from the history
//! - **Storage**: SQLite key-value store and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`WorkoutHistory`]: Completed-set persistence and statistics
//! - [`Trainer`]: Engine and history wired together
//! - [`Database`]: SQLite-backed [`KvStore`]
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod error;
pub mod events;
pub mod history;
pub mod storage;
pub mod timer;
pub mod trainer;

pub use calendar::{CalendarDay, Intensity, MonthKey, MonthView};
pub use error::{ConfigError, CoreError, StorageError, TimerError, ValidationError};
pub use events::Event;
pub use history::{WorkoutDay, WorkoutHistory};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use timer::{Phase, RunState, Ticker, TimerConfig, TimerEngine, TimerState};
pub use trainer::{Dashboard, RunControl, Trainer};
