//! Interval timer engine.
//!
//! The engine is a second-granularity state machine. It does not own a
//! clock or a thread: whoever drives it calls `tick()` once per elapsed
//! second while it is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |
//!           +-- set completed --> Idle (rewound to iteration 1)
//! ```
//!
//! Within a running set the phases alternate
//! `Session(1) -> Break -> Session(2) -> ... -> Session(N)`, with no break
//! after the last session.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerConfig::default());
//! engine.start();
//! // once per second:
//! if let Some(event) = engine.tick() { /* phase change or set completed */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::TimerConfig;
use crate::error::TimerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Session,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Not started, or rewound by a reset or a completed set.
    Idle,
    Running,
    Paused,
}

/// Everything that changes while the timer runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    /// 1-based, never above the configured iteration count.
    pub current_iteration: u32,
    /// Seconds left in the current phase.
    pub time_left_secs: u32,
    pub run_state: RunState,
    /// Sets completed over the lifetime of this engine.
    pub completed_sets: u32,
}

impl TimerState {
    /// Start-of-set position for `config`.
    pub fn initial(config: &TimerConfig) -> Self {
        Self {
            phase: Phase::Session,
            current_iteration: 1,
            time_left_secs: config.session_seconds(),
            run_state: RunState::Idle,
            completed_sets: 0,
        }
    }

    pub fn running(&self) -> bool {
        self.run_state == RunState::Running
    }

    fn rewind(&mut self, config: &TimerConfig) {
        self.phase = Phase::Session;
        self.current_iteration = 1;
        self.time_left_secs = config.session_seconds();
        self.run_state = RunState::Idle;
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// The engine was not running; nothing changed.
    Stopped,
    /// One second came off the current phase.
    Countdown,
    /// The countdown ran out and the next phase began.
    PhaseStarted,
    /// The last session of the set finished.
    SetCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: TimerState,
    pub kind: TransitionKind,
}

/// Apply one elapsed second to `state`.
///
/// The countdown's last second is where the phase changes: a phase of
/// `n` seconds is left after exactly `n` ticks, so `time_left_secs` never
/// has to pass below zero.
pub fn transition(config: &TimerConfig, state: &TimerState) -> Transition {
    let mut next = state.clone();
    if !state.running() {
        return Transition {
            state: next,
            kind: TransitionKind::Stopped,
        };
    }

    if state.time_left_secs > 1 {
        next.time_left_secs -= 1;
        return Transition {
            state: next,
            kind: TransitionKind::Countdown,
        };
    }

    let last_iteration = state.current_iteration >= config.total_iterations();
    let kind = match (state.phase, last_iteration) {
        (Phase::Session, false) => {
            next.phase = Phase::Break;
            next.time_left_secs = config.break_seconds();
            TransitionKind::PhaseStarted
        }
        (Phase::Break, false) => {
            next.current_iteration += 1;
            next.phase = Phase::Session;
            next.time_left_secs = config.session_seconds();
            TransitionKind::PhaseStarted
        }
        (_, true) => {
            next.completed_sets = next.completed_sets.saturating_add(1);
            next.rewind(config);
            TransitionKind::SetCompleted
        }
    };
    Transition { state: next, kind }
}

/// Core interval timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    config: TimerConfig,
    state: TimerState,
}

impl TimerEngine {
    /// Create an idle engine positioned at the first session.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            state: TimerState::initial(&config),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    pub fn is_running(&self) -> bool {
        self.state.running()
    }

    pub fn current_iteration(&self) -> u32 {
        self.state.current_iteration
    }

    pub fn total_iterations(&self) -> u32 {
        self.config.total_iterations()
    }

    pub fn time_left_secs(&self) -> u32 {
        self.state.time_left_secs
    }

    pub fn completed_sets(&self) -> u32 {
        self.state.completed_sets
    }

    pub fn phase_duration_secs(&self) -> u32 {
        match self.state.phase {
            Phase::Session => self.config.session_seconds(),
            Phase::Break => self.config.break_seconds(),
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress_fraction(&self) -> f64 {
        let total = f64::from(self.phase_duration_secs());
        let left = f64::from(self.state.time_left_secs);
        ((total - left) / total).clamp(0.0, 1.0)
    }

    /// Configuration is only open before anything has run.
    pub fn can_configure(&self) -> bool {
        self.state.run_state == RunState::Idle
            && self.state.current_iteration == 1
            && self.state.phase == Phase::Session
    }

    /// True when the state satisfies every range invariant for the config.
    /// Used to reject engines restored from tampered storage.
    pub fn is_consistent(&self) -> bool {
        let s = &self.state;
        s.current_iteration >= 1
            && s.current_iteration <= self.config.total_iterations()
            && s.time_left_secs <= self.phase_duration_secs()
            && !(s.phase == Phase::Break && s.current_iteration >= self.config.total_iterations())
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            run_state: self.state.run_state,
            current_iteration: self.state.current_iteration,
            total_iterations: self.config.total_iterations(),
            remaining_secs: self.state.time_left_secs,
            phase_duration_secs: self.phase_duration_secs(),
            progress: self.progress_fraction(),
            completed_sets: self.state.completed_sets,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the config and rewind the countdown to the new session length.
    ///
    /// # Errors
    /// Returns `TimerError::InvalidState` once a run has begun; the engine
    /// is left untouched.
    pub fn configure(&mut self, config: TimerConfig) -> Result<Event, TimerError> {
        if !self.can_configure() {
            return Err(TimerError::InvalidState {
                operation: "configure",
                run_state: self.state.run_state,
                phase: self.state.phase,
                iteration: self.state.current_iteration,
            });
        }
        self.config = config;
        self.state.time_left_secs = config.session_seconds();
        Ok(Event::TimerConfigured {
            session_seconds: config.session_seconds(),
            break_seconds: config.break_seconds(),
            total_iterations: config.total_iterations(),
            at: Utc::now(),
        })
    }

    pub fn start(&mut self) -> Option<Event> {
        match self.state.run_state {
            RunState::Running => None,
            RunState::Idle | RunState::Paused => {
                self.state.run_state = RunState::Running;
                Some(Event::TimerStarted {
                    phase: self.state.phase,
                    iteration: self.state.current_iteration,
                    remaining_secs: self.state.time_left_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state.run_state {
            RunState::Running => {
                self.state.run_state = RunState::Paused;
                Some(Event::TimerPaused {
                    phase: self.state.phase,
                    iteration: self.state.current_iteration,
                    remaining_secs: self.state.time_left_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Rewind to the first session and stop. Config and the completed-set
    /// counter survive.
    pub fn reset(&mut self) -> Option<Event> {
        self.state.rewind(&self.config);
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Call once per elapsed second. Returns `Some` when a phase changed or
    /// the set completed; plain countdown seconds return `None`.
    pub fn tick(&mut self) -> Option<Event> {
        let Transition { state, kind } = transition(&self.config, &self.state);
        self.state = state;
        match kind {
            TransitionKind::Stopped | TransitionKind::Countdown => None,
            TransitionKind::PhaseStarted => {
                tracing::debug!(
                    "phase {:?} started, iteration {}/{}",
                    self.state.phase,
                    self.state.current_iteration,
                    self.config.total_iterations()
                );
                Some(Event::PhaseStarted {
                    phase: self.state.phase,
                    iteration: self.state.current_iteration,
                    duration_secs: self.phase_duration_secs(),
                    at: Utc::now(),
                })
            }
            TransitionKind::SetCompleted => Some(Event::SetCompleted {
                completed_sets: self.state.completed_sets,
                iterations: self.config.total_iterations(),
                at: Utc::now(),
            }),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

/// Render seconds as `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(session: u32, brk: u32, iterations: u32) -> TimerEngine {
        TimerEngine::new(TimerConfig::new(session, brk, iterations).unwrap())
    }

    #[test]
    fn start_pause_start() {
        let mut engine = TimerEngine::default();
        assert_eq!(engine.run_state(), RunState::Idle);

        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
        assert_eq!(engine.run_state(), RunState::Running);

        assert!(engine.pause().is_some());
        assert!(engine.pause().is_none());
        assert_eq!(engine.run_state(), RunState::Paused);

        assert!(engine.start().is_some());
        assert!(engine.is_running());
    }

    #[test]
    fn tick_does_nothing_while_stopped() {
        let mut engine = engine(3, 2, 2);
        assert!(engine.tick().is_none());
        assert_eq!(engine.time_left_secs(), 3);

        engine.start();
        engine.tick();
        engine.pause();
        engine.tick();
        engine.tick();
        assert_eq!(engine.time_left_secs(), 2);
    }

    #[test]
    fn worked_example_three_two_two() {
        let mut engine = engine(3, 2, 2);
        engine.start();

        assert!(engine.tick().is_none());
        assert_eq!(engine.time_left_secs(), 2);
        assert!(engine.tick().is_none());
        assert_eq!(engine.time_left_secs(), 1);

        let event = engine.tick().unwrap();
        assert!(matches!(
            event,
            Event::PhaseStarted {
                phase: Phase::Break,
                iteration: 1,
                duration_secs: 2,
                ..
            }
        ));
        assert_eq!(engine.time_left_secs(), 2);

        assert!(engine.tick().is_none());
        assert_eq!(engine.time_left_secs(), 1);
        engine.tick().unwrap();
        assert_eq!(engine.phase(), Phase::Session);
        assert_eq!(engine.current_iteration(), 2);
        assert_eq!(engine.time_left_secs(), 3);

        assert!(engine.tick().is_none());
        assert!(engine.tick().is_none());
        let done = engine.tick().unwrap();
        assert!(done.is_set_completed());
        assert_eq!(engine.current_iteration(), 1);
        assert_eq!(engine.phase(), Phase::Session);
        assert_eq!(engine.time_left_secs(), 3);
        assert!(!engine.is_running());
        assert_eq!(engine.run_state(), RunState::Idle);
        assert_eq!(engine.completed_sets(), 1);
    }

    #[test]
    fn single_iteration_never_enters_break() {
        let mut engine = engine(2, 5, 1);
        engine.start();
        assert!(engine.tick().is_none());
        assert_eq!(engine.phase(), Phase::Session);
        let event = engine.tick().unwrap();
        assert!(event.is_set_completed());
        assert_eq!(engine.phase(), Phase::Session);
        assert!(!engine.is_running());
    }

    #[test]
    fn one_second_phases_change_every_tick() {
        let mut engine = engine(1, 1, 2);
        engine.start();
        engine.tick();
        assert_eq!(engine.phase(), Phase::Break);
        engine.tick();
        assert_eq!(engine.phase(), Phase::Session);
        assert_eq!(engine.current_iteration(), 2);
        assert!(engine.tick().unwrap().is_set_completed());
    }

    #[test]
    fn reset_rewinds_but_keeps_config_and_count() {
        let mut engine = engine(3, 2, 2);
        engine.start();
        for _ in 0..8 {
            engine.tick();
        }
        assert_eq!(engine.completed_sets(), 1);
        engine.start();
        for _ in 0..4 {
            engine.tick();
        }
        assert_eq!(engine.phase(), Phase::Break);

        assert!(matches!(engine.reset(), Some(Event::TimerReset { .. })));
        assert_eq!(engine.phase(), Phase::Session);
        assert_eq!(engine.current_iteration(), 1);
        assert_eq!(engine.time_left_secs(), 3);
        assert!(!engine.is_running());
        assert_eq!(engine.config(), &TimerConfig::new(3, 2, 2).unwrap());
        assert_eq!(engine.completed_sets(), 1);
    }

    #[test]
    fn configure_only_before_running() {
        let mut engine = engine(3, 2, 2);
        let event = engine.configure(TimerConfig::new(10, 5, 3).unwrap()).unwrap();
        assert!(matches!(event, Event::TimerConfigured { total_iterations: 3, .. }));
        assert_eq!(engine.time_left_secs(), 10);

        engine.start();
        let err = engine
            .configure(TimerConfig::new(1, 1, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, TimerError::InvalidState { operation: "configure", .. }));
        assert_eq!(engine.total_iterations(), 3);

        engine.pause();
        assert!(engine.configure(TimerConfig::new(1, 1, 1).unwrap()).is_err());
        assert_eq!(engine.time_left_secs(), 10);

        engine.reset();
        assert!(engine.configure(TimerConfig::new(1, 1, 1).unwrap()).is_ok());
    }

    #[test]
    fn progress_fraction_tracks_phase() {
        let mut engine = engine(4, 2, 2);
        assert_eq!(engine.progress_fraction(), 0.0);
        engine.start();
        engine.tick();
        assert!((engine.progress_fraction() - 0.25).abs() < f64::EPSILON);
        engine.tick();
        engine.tick();
        assert!((engine.progress_fraction() - 0.75).abs() < f64::EPSILON);
        engine.tick();
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.progress_fraction(), 0.0);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = TimerEngine::default();
        match engine.snapshot() {
            Event::StateSnapshot {
                run_state,
                current_iteration,
                total_iterations,
                remaining_secs,
                ..
            } => {
                assert_eq!(run_state, RunState::Idle);
                assert_eq!(current_iteration, 1);
                assert_eq!(total_iterations, 6);
                assert_eq!(remaining_secs, 40);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn transition_leaves_input_untouched() {
        let config = TimerConfig::new(3, 2, 2).unwrap();
        let mut state = TimerState::initial(&config);
        state.run_state = RunState::Running;
        let before = state.clone();
        let t = transition(&config, &state);
        assert_eq!(state, before);
        assert_eq!(t.kind, TransitionKind::Countdown);
        assert_eq!(t.state.time_left_secs, 2);
    }

    #[test]
    fn consistency_check_flags_break_on_last_iteration() {
        let mut engine = engine(3, 2, 2);
        assert!(engine.is_consistent());
        engine.state.phase = Phase::Break;
        engine.state.current_iteration = 2;
        assert!(!engine.is_consistent());
    }

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(40), "00:40");
        assert_eq!(format_clock(125), "02:05");
        assert_eq!(format_clock(3600), "60:00");
    }
}
