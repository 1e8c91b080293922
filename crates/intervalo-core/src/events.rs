use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, RunState};

/// Every state change of the timer produces an Event.
/// Front ends print or render them; the trainer watches for `SetCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        iteration: u32,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        iteration: u32,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    TimerConfigured {
        session_seconds: u32,
        break_seconds: u32,
        total_iterations: u32,
        at: DateTime<Utc>,
    },
    /// The countdown ran out and the next phase began.
    PhaseStarted {
        phase: Phase,
        iteration: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// All iterations finished; the engine rewound and stopped.
    SetCompleted {
        /// Sets completed by this engine so far, including this one.
        completed_sets: u32,
        iterations: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        run_state: RunState,
        current_iteration: u32,
        total_iterations: u32,
        remaining_secs: u32,
        phase_duration_secs: u32,
        progress: f64,
        completed_sets: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_set_completed(&self) -> bool {
        matches!(self, Event::SetCompleted { .. })
    }
}
