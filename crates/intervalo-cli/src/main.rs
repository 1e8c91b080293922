use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "intervalo", version, about = "Intervalo interval timer CLI")]
struct Cli {
    /// Data directory (defaults to ~/.config/intervalo)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Workout statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let data_dir = cli.data_dir;
    let result = match cli.command {
        Commands::Timer { action } => {
            commands::Context::new(data_dir).and_then(|ctx| commands::timer::run(&ctx, action))
        }
        Commands::Stats { action } => {
            commands::Context::new(data_dir).and_then(|ctx| commands::stats::run(&ctx, action))
        }
        Commands::Config { action } => {
            commands::Context::new(data_dir).and_then(|ctx| commands::config::run(&ctx, action))
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "intervalo", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
