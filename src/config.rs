use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{BitHunterError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: EnvironmentConfig,
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub backtest: BacktestConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Trading environment parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    /// Starting cash balance
    pub initial_balance: f64,
    /// Adverse move that forces an exit (0.05 = 5%)
    pub stop_loss: f64,
    /// Favorable move that forces an exit (0.10 = 10%)
    pub take_profit: f64,
    /// Penalty for holding a losing position
    pub hold_penalty: f64,
    /// Commission per entry/exit leg (0.001 = 0.1%)
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
}

fn default_commission_rate() -> f64 {
    0.001
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            initial_balance: 10_000.0,
            stop_loss: 0.05,
            take_profit: 0.10,
            hold_penalty: 0.1,
            commission_rate: default_commission_rate(),
        }
    }
}

impl EnvironmentConfig {
    /// Collect every invalid parameter
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(self.initial_balance.is_finite() && self.initial_balance > 0.0) {
            errors.push("initial_balance must be positive".to_string());
        }
        if !(self.stop_loss.is_finite() && self.stop_loss > 0.0) {
            errors.push("stop_loss must be positive".to_string());
        }
        if !(self.take_profit.is_finite() && self.take_profit > 0.0) {
            errors.push("take_profit must be positive".to_string());
        }
        if !(self.hold_penalty.is_finite() && self.hold_penalty >= 0.0) {
            errors.push("hold_penalty must be non-negative".to_string());
        }
        if !(0.0..1.0).contains(&self.commission_rate) {
            errors.push("commission_rate must be in [0, 1)".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// How trade decisions reach a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Simulated,
    Live,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Live => "live",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = BitHunterError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "simulated" | "sim" | "demo" => Ok(Self::Simulated),
            "live" => Ok(Self::Live),
            _ => Err(BitHunterError::validation(
                "invalid execution mode; expected simulated|live",
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
    /// Traded pair
    pub symbol: String,
    /// Base-asset amount per order
    pub order_amount: Decimal,
    /// Fill price used by the simulated executor
    pub simulated_price: Decimal,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Simulated,
            symbol: "BTC/USDT".to_string(),
            order_amount: Decimal::new(1, 2),
            simulated_price: Decimal::from(50_000),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BacktestConfig {
    /// Seed for the random policy (entropy when unset)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Annualization factor for the Sharpe ratio
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
}

fn default_periods_per_year() -> f64 {
    252.0
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            seed: None,
            periods_per_year: default_periods_per_year(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentConfig::default(),
            execution: ExecutionConfig::default(),
            backtest: BacktestConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> std::result::Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("environment.initial_balance", 10_000.0)?
            .set_default("environment.stop_loss", 0.05)?
            .set_default("environment.take_profit", 0.10)?
            .set_default("environment.hold_penalty", 0.1)?
            .set_default("environment.commission_rate", 0.001)?
            .set_default("execution.mode", "simulated")?
            .set_default("execution.symbol", "BTC/USDT")?
            .set_default("execution.order_amount", "0.01")?
            .set_default("execution.simulated_price", "50000")?
            .set_default("backtest.periods_per_year", 252.0)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("BITHUNTER_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (BITHUNTER_ENVIRONMENT__STOP_LOSS, etc.)
            .add_source(
                Environment::with_prefix("BITHUNTER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = match self.environment.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        };

        if self.execution.order_amount <= Decimal::ZERO {
            errors.push("execution.order_amount must be positive".to_string());
        }
        if self.execution.simulated_price <= Decimal::ZERO {
            errors.push("execution.simulated_price must be positive".to_string());
        }
        if self.execution.symbol.trim().is_empty() {
            errors.push("execution.symbol cannot be empty".to_string());
        }
        if !(self.backtest.periods_per_year.is_finite() && self.backtest.periods_per_year > 0.0) {
            errors.push("backtest.periods_per_year must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all problems into one error
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| BitHunterError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.environment.initial_balance, 10_000.0);
        assert_eq!(config.execution.order_amount, dec!(0.01));
        assert_eq!(config.execution.mode, ExecutionMode::Simulated);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = AppConfig::default();
        config.environment.stop_loss = 0.0;
        config.environment.initial_balance = -1.0;
        config.execution.order_amount = Decimal::ZERO;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(config.ensure_valid().is_err());
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let config = AppConfig::load_from("/nonexistent/bithunter-config").unwrap();
        assert_eq!(config.environment.take_profit, 0.10);
        assert_eq!(config.execution.simulated_price, dec!(50000));
        assert_eq!(config.backtest.periods_per_year, 252.0);
    }

    #[test]
    fn test_env_var_overrides_nested_key() {
        std::env::set_var("BITHUNTER_ENVIRONMENT__STOP_LOSS", "0.03");
        let loaded = AppConfig::load_from("/nonexistent/bithunter-env-override");
        std::env::remove_var("BITHUNTER_ENVIRONMENT__STOP_LOSS");

        let config = loaded.unwrap();
        assert_eq!(config.environment.stop_loss, 0.03);
        assert_eq!(config.environment.take_profit, 0.10);
    }

    #[test]
    fn test_execution_mode_parse() {
        assert_eq!("live".parse::<ExecutionMode>().unwrap(), ExecutionMode::Live);
        assert_eq!("demo".parse::<ExecutionMode>().unwrap(), ExecutionMode::Simulated);
        assert!("paper-ish".parse::<ExecutionMode>().is_err());
    }
}
