//! Handles settings for the application.
//!
//! Configuration is read from `settings.toml` (optional) and from
//! `PRIZECASH__SECTION__KEY` environment variables, the latter taking
//! precedence. See `settings.example.toml` at the repository root.
use config::{Config, ConfigError, Environment, File};
use engine::{Charity, EngineError, PrizeCash};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Donations {
    /// Minimum donation, in prizecash.
    pub min_cash_donation: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
    pub donations: Option<Donations>,
    #[serde(default)]
    pub charities: Vec<Charity>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(
                    Environment::with_prefix("PRIZECASH")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("server.port", 3000)?
            .build()?
            .try_deserialize()
    }

    /// Configured minimum donation, if any. Must be positive with at most
    /// two decimals.
    pub fn min_cash_donation(&self) -> Result<Option<PrizeCash>, EngineError> {
        let Some(value) = self.donations.as_ref().and_then(|d| d.min_cash_donation) else {
            return Ok(None);
        };
        let amount = PrizeCash::from_number(value)?;
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "min_cash_donation must be > 0, got {amount}"
            )));
        }
        Ok(Some(amount))
    }
}
