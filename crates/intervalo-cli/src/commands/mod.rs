pub mod config;
pub mod stats;
pub mod timer;

use std::path::PathBuf;

use intervalo_core::error::Result;
use intervalo_core::storage::data_dir;
use intervalo_core::{Config, Database, Trainer};

/// Where this invocation reads and writes its files.
pub struct Context {
    pub data_dir: PathBuf,
}

impl Context {
    pub fn new(data_dir_override: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir_override {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                dir
            }
            None => data_dir()?,
        };
        tracing::debug!("using data directory {}", data_dir.display());
        Ok(Self { data_dir })
    }

    pub fn config(&self) -> Config {
        Config::load_or_default(&self.data_dir)
    }

    pub fn database(&self) -> Result<Database> {
        Ok(Database::open_in(&self.data_dir)?)
    }

    /// Saved engine and history, or a fresh engine from `config.toml`.
    pub fn trainer(&self) -> Result<Trainer<Database>> {
        let fallback = self.config().timer_config();
        Ok(Trainer::restore(self.database()?, fallback))
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
