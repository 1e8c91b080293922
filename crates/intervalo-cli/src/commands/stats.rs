use chrono::Datelike;
use clap::Subcommand;
use intervalo_core::error::Result;
use intervalo_core::history::local_today;
use intervalo_core::{Intensity, MonthKey, MonthView, WorkoutHistory};
use serde::Serialize;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's completed sets
    Today,
    /// Current and longest streak
    Streak,
    /// Every recorded day as JSON
    History,
    /// Month heatmap
    Calendar {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
        /// Print the month view as JSON instead of a grid
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct StreakReport {
    current: u32,
    longest: u32,
    total_sets: u64,
}

fn glyph(intensity: Intensity) -> char {
    match intensity {
        Intensity::None => '·',
        Intensity::Light => '░',
        Intensity::Moderate => '▒',
        Intensity::Strong => '▓',
        Intensity::Peak => '█',
    }
}

fn render_month(view: &MonthView) -> String {
    let mut out = format!(
        "{:04}-{:02}  {} set(s) on {} day(s)\n",
        view.month.year(),
        view.month.month(),
        view.total_sets(),
        view.active_days()
    );
    out.push_str(" Su  Mo  Tu  We  Th  Fr  Sa\n");
    for week in view.weeks() {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(day) => format!("{:>2}{}", day.date.day(), glyph(day.intensity)),
                None => "   ".to_string(),
            })
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

pub fn run(ctx: &Context, action: StatsAction) -> Result<()> {
    let history = WorkoutHistory::load(ctx.database()?);

    match action {
        StatsAction::Today => {
            print_json(&history.today_stats())?;
        }
        StatsAction::Streak => {
            print_json(&StreakReport {
                current: history.streak(),
                longest: history.longest_streak(),
                total_sets: history.total_sets(),
            })?;
        }
        StatsAction::History => {
            print_json(&history.days())?;
        }
        StatsAction::Calendar { year, month, json } => {
            let current = MonthKey::containing(local_today());
            let key = MonthKey::new(
                year.unwrap_or(current.year()),
                month.unwrap_or(current.month()),
            )?;
            let view = MonthView::build(history.days(), key);
            if json {
                print_json(&view)?;
            } else {
                print!("{}", render_month(&view));
            }
        }
    }
    Ok(())
}
