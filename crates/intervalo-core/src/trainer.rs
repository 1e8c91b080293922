//! Timer engine and workout history wired together.
//!
//! The engine knows nothing about storage; the trainer watches its tick
//! results and books one completed set in the history per `SetCompleted`.

use std::time::Duration;

use serde::Serialize;

use crate::error::{StorageError, TimerError};
use crate::events::Event;
use crate::history::{WorkoutDay, WorkoutHistory};
use crate::storage::{read_json, KvStore};
use crate::timer::{Ticker, TimerConfig, TimerEngine};

pub const ENGINE_KEY: &str = "timer_engine";

/// Everything a front end shows on one screen.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub timer: Event,
    pub today: WorkoutDay,
    pub streak: u32,
}

pub struct Trainer<S: KvStore> {
    engine: TimerEngine,
    history: WorkoutHistory<S>,
}

impl<S: KvStore> Trainer<S> {
    pub fn new(engine: TimerEngine, history: WorkoutHistory<S>) -> Self {
        Self { engine, history }
    }

    /// Load the history and the saved engine from `store`.
    ///
    /// A missing, corrupt or inconsistent saved engine is replaced by an
    /// idle engine built from `fallback`.
    pub fn restore(store: S, fallback: TimerConfig) -> Self {
        let engine = match read_json::<TimerEngine, _>(&store, ENGINE_KEY) {
            Ok(Some(engine)) if engine.is_consistent() => engine,
            Ok(Some(_)) => {
                tracing::warn!("Saved timer state is inconsistent, starting fresh");
                TimerEngine::new(fallback)
            }
            Ok(None) => TimerEngine::new(fallback),
            Err(e) => {
                tracing::warn!("Failed to load saved timer state, starting fresh: {e}");
                TimerEngine::new(fallback)
            }
        };
        Self::new(engine, WorkoutHistory::load(store))
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn history(&self) -> &WorkoutHistory<S> {
        &self.history
    }

    pub fn start(&mut self) -> Option<Event> {
        self.engine.start()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.engine.pause()
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.engine.reset()
    }

    /// # Errors
    /// Fails once a run has begun; see [`TimerEngine::configure`].
    pub fn configure(&mut self, config: TimerConfig) -> Result<Event, TimerError> {
        self.engine.configure(config)
    }

    /// Advance the engine one second and book any completed set.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick();
        if let Some(Event::SetCompleted { completed_sets, .. }) = &event {
            tracing::info!(
                "Set completed ({} this session), recording workout",
                completed_sets
            );
            self.history.record_completion(1);
        }
        event
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            timer: self.engine.snapshot(),
            today: self.history.today_stats(),
            streak: self.history.streak(),
        }
    }

    /// Save the engine so a later process can pick up where this one stopped.
    ///
    /// # Errors
    /// Returns an error if the engine cannot be encoded or written.
    pub fn persist_engine(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.engine).map_err(|e| StorageError::WriteFailed {
            key: ENGINE_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.history.store_mut().kv_set(ENGINE_KEY, &json)
    }

    fn save_engine(&mut self) {
        if let Err(e) = self.persist_engine() {
            tracing::warn!("Failed to save timer state: {e}");
        }
    }

    /// Tick in real time for as long as the engine is running.
    ///
    /// A ticker is held only while the engine runs and is dropped the
    /// moment it stops, whether by a completed set or by `on_event`
    /// pausing it through the returned control. The engine is saved at
    /// every phase change and on pause, so an interrupted run resumes from
    /// the last boundary. Returns the number of ticks processed.
    pub async fn run<F>(&mut self, period: Duration, mut on_event: F) -> u64
    where
        F: FnMut(&Event, &TimerEngine) -> RunControl,
    {
        let mut ticks = 0;
        if !self.engine.is_running() {
            return ticks;
        }
        let mut ticker = Ticker::start(period);
        while self.engine.is_running() {
            if ticker.next().await.is_none() {
                break;
            }
            ticks += 1;
            let event = match self.tick() {
                Some(event) => {
                    self.save_engine();
                    event
                }
                None => self.engine.snapshot(),
            };
            if on_event(&event, &self.engine) == RunControl::Pause {
                self.engine.pause();
                self.save_engine();
            }
        }
        ticker.stop();
        ticks
    }
}

/// Returned by the `run` callback to keep going or pause the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunControl {
    Continue,
    Pause,
}
