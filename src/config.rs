use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_credit_score_weight")]
    pub credit_score: f64,
    #[serde(default = "default_time_in_business_weight")]
    pub time_in_business: f64,
    #[serde(default = "default_loan_amount_weight")]
    pub loan_amount: f64,
    #[serde(default = "default_equipment_type_weight")]
    pub equipment_type: f64,
    #[serde(default = "default_industry_weight")]
    pub industry: f64,
    #[serde(default = "default_working_capital_weight")]
    pub working_capital: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            credit_score: default_credit_score_weight(),
            time_in_business: default_time_in_business_weight(),
            loan_amount: default_loan_amount_weight(),
            equipment_type: default_equipment_type_weight(),
            industry: default_industry_weight(),
            working_capital: default_working_capital_weight(),
        }
    }
}

fn default_credit_score_weight() -> f64 { 25.0 }
fn default_time_in_business_weight() -> f64 { 25.0 }
fn default_loan_amount_weight() -> f64 { 25.0 }
fn default_equipment_type_weight() -> f64 { 15.0 }
fn default_industry_weight() -> f64 { 10.0 }
fn default_working_capital_weight() -> f64 { 15.0 }

impl WeightsConfig {
    /// Convert into scoring weights, rejecting negative or non-finite values
    pub fn to_weights(&self) -> Result<ScoringWeights, ConfigError> {
        let weights = ScoringWeights {
            credit_score: self.credit_score,
            time_in_business: self.time_in_business,
            loan_amount: self.loan_amount,
            equipment_type: self.equipment_type,
            industry: self.industry,
            working_capital: self.working_capital,
        };

        let all = [
            ("credit_score", weights.credit_score),
            ("time_in_business", weights.time_in_business),
            ("loan_amount", weights.loan_amount),
            ("equipment_type", weights.equipment_type),
            ("industry", weights.industry),
            ("working_capital", weights.working_capital),
        ];
        if let Some((name, value)) = all.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Message(format!(
                "scoring.weights.{} must be a non-negative number, got {}",
                name, value
            )));
        }

        Ok(weights)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// Apply `LOG_LEVEL` / `LOG_FORMAT` style overrides on top of the file values
    pub fn with_overrides(self, level: Option<String>, format: Option<String>) -> Self {
        Self {
            level: level.filter(|l| !l.trim().is_empty()).unwrap_or(self.level),
            format: format.filter(|f| !f.trim().is_empty()).unwrap_or(self.format),
        }
    }

    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with LENDER_MATCH__)
    /// 4. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., LENDER_MATCH__SERVER__PORT -> server.port
            .add_source(env_source());

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("LENDER_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
