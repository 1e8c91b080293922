use clap::Subcommand;
use intervalo_core::error::Result;
use intervalo_core::{Config, ConfigError};

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.session_seconds", "ticker.period_ms")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = ctx.config();
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(&ctx.data_dir)?;
            config.set(&key, &value)?;
            config.save_to(&ctx.data_dir)?;
            println!("ok");
        }
        ConfigAction::List => {
            print_json(&ctx.config())?;
        }
        ConfigAction::Reset => {
            Config::default().save_to(&ctx.data_dir)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
