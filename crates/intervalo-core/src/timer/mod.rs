mod config;
mod engine;
pub mod ticker;

pub use config::TimerConfig;
pub use engine::{
    format_clock, transition, Phase, RunState, TimerEngine, TimerState, Transition,
    TransitionKind,
};
pub use ticker::Ticker;
