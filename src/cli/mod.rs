//! BitHunter CLI
//!
//! Commands:
//! - `bithunter backtest` - Replay an episode and print risk metrics
//! - `bithunter simulate` - Step a random agent and render each state
//! - `bithunter sample` - Write a synthetic market series
//! - `bithunter trade` - Execute one action through the configured executor
//! - `bithunter config` - Show the effective configuration

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::rl::core::Action;

/// BitHunter trading environment CLI
#[derive(Parser, Debug)]
#[command(name = "bithunter")]
#[command(version)]
#[command(about = "Sentiment-aware crypto trading environment and backtester", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration directory (default.toml, <BITHUNTER_ENV>.toml)
    #[arg(short, long, global = true, default_value = "config", env = "BITHUNTER_CONFIG_DIR")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Backtest an action sequence (random actions when omitted)
    Backtest {
        /// JSON file of [{price, volume, sentiment}] rows
        #[arg(long)]
        data: PathBuf,
        /// Comma separated actions, e.g. 1,0,2 or buy,hold,sell
        #[arg(long, value_delimiter = ',')]
        actions: Option<Vec<Action>>,
        /// Seed for random actions
        #[arg(long)]
        seed: Option<u64>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run random steps and render the environment after each
    Simulate {
        #[arg(long)]
        data: PathBuf,
        /// Number of steps (defaults to the full episode)
        #[arg(long)]
        steps: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate a synthetic random-walk series
    Sample {
        #[arg(long, default_value = "100")]
        len: usize,
        /// Per-step price volatility
        #[arg(long, default_value = "0.02")]
        volatility: f64,
        #[arg(long)]
        seed: Option<u64>,
        /// Output JSON file
        #[arg(long)]
        out: PathBuf,
    },
    /// Execute a single action (buy, sell or hold)
    Trade {
        #[arg(long)]
        action: Action,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backtest_actions() {
        let cli = Cli::try_parse_from([
            "bithunter",
            "backtest",
            "--data",
            "series.json",
            "--actions",
            "1,hold,sell",
            "--seed",
            "7",
        ])
        .unwrap();

        match cli.command {
            Commands::Backtest { actions, seed, json, .. } => {
                assert_eq!(actions, Some(vec![Action::Buy, Action::Hold, Action::Sell]));
                assert_eq!(seed, Some(7));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_action() {
        assert!(Cli::try_parse_from(["bithunter", "trade", "--action", "moon"]).is_err());
    }

    #[test]
    fn config_dir_is_global() {
        let cli = Cli::try_parse_from(["bithunter", "config", "--config", "/etc/bithunter"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/bithunter"));
    }
}
