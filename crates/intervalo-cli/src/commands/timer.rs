use std::time::Duration;

use clap::Subcommand;
use intervalo_core::error::Result;
use intervalo_core::timer::format_clock;
use intervalo_core::{Event, Phase, RunControl, TimerConfig};

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Rewind to the first session and stop
    Reset,
    /// Change durations and iterations (only before a run begins)
    Configure {
        /// Session length in seconds
        #[arg(long)]
        session: u32,
        /// Break length in seconds
        #[arg(long = "break")]
        break_secs: u32,
        /// Sessions per set
        #[arg(long)]
        iterations: u32,
    },
    /// Advance a running timer by whole seconds
    Tick {
        #[arg(long, default_value = "1")]
        count: u64,
    },
    /// Start and count down in real time until the set completes
    Run {
        /// Tick period in milliseconds (defaults to ticker.period_ms)
        #[arg(long)]
        period_ms: Option<u64>,
    },
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Session => "SESSION",
        Phase::Break => "BREAK",
    }
}

pub fn run(ctx: &Context, action: TimerAction) -> Result<()> {
    let mut trainer = ctx.trainer()?;

    match action {
        TimerAction::Status => {
            print_json(&trainer.dashboard())?;
        }
        TimerAction::Start => {
            let event = trainer.start().unwrap_or_else(|| trainer.engine().snapshot());
            print_json(&event)?;
        }
        TimerAction::Pause => {
            let event = trainer.pause().unwrap_or_else(|| trainer.engine().snapshot());
            print_json(&event)?;
        }
        TimerAction::Reset => {
            if let Some(event) = trainer.reset() {
                print_json(&event)?;
            }
        }
        TimerAction::Configure {
            session,
            break_secs,
            iterations,
        } => {
            let config = TimerConfig::new(session, break_secs, iterations)?;
            let event = trainer.configure(config)?;
            print_json(&event)?;
        }
        TimerAction::Tick { count } => {
            let events: Vec<Event> = (0..count).filter_map(|_| trainer.tick()).collect();
            print_json(&events)?;
            print_json(&trainer.engine().snapshot())?;
        }
        TimerAction::Run { period_ms } => {
            let period_ms = period_ms.unwrap_or_else(|| ctx.config().ticker.period_ms);
            trainer.start();
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(trainer.run(Duration::from_millis(period_ms), |event, engine| {
                match event {
                    Event::PhaseStarted {
                        phase, iteration, ..
                    } => println!(
                        "-- {} {}/{}",
                        phase_label(*phase),
                        iteration,
                        engine.total_iterations()
                    ),
                    Event::SetCompleted { completed_sets, .. } => {
                        println!("-- set completed ({completed_sets} this session)")
                    }
                    _ => {}
                }
                println!(
                    "{:<7} {}/{} {}",
                    phase_label(engine.phase()),
                    engine.current_iteration(),
                    engine.total_iterations(),
                    format_clock(engine.time_left_secs())
                );
                RunControl::Continue
            }));
            let today = trainer.history().today_stats();
            println!(
                "today: {} set(s), streak: {} day(s)",
                today.completed_sets,
                trainer.history().streak()
            );
        }
    }

    trainer.persist_engine()?;
    Ok(())
}
