//! Backtest Engine
//!
//! Drives a full episode of a [`TradingEnvironment`] with a fixed action
//! sequence, random actions, or an injected policy, and summarizes it.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::trading::TradingEnvironment;
use crate::analysis::performance::{
    period_returns, sharpe_ratio, value_at_risk, DrawdownTracker, TRADING_PERIODS_PER_YEAR,
};
use crate::rl::core::Action;
use crate::rl::policy::{FixedActions, Policy, RandomPolicy};

/// Confidence level of the reported VaR
pub const VAR_CONFIDENCE: f64 = 0.95;

/// Summary of one backtest run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub total_reward: f64,
    /// Share of decided steps (non-zero reward) with positive reward
    pub win_rate: f64,
    /// Largest fractional decline of the balance from its running peak
    pub max_drawdown: f64,
    pub final_balance: f64,
    /// Number of decided steps (wins + losses)
    pub num_trades: usize,
    pub sharpe_ratio: f64,
    pub var_95: f64,
}

/// Replays one episode and computes risk metrics
pub struct BacktestEngine<'a> {
    env: &'a mut TradingEnvironment,
    periods_per_year: f64,
    seed: Option<u64>,
}

impl<'a> BacktestEngine<'a> {
    pub fn new(env: &'a mut TradingEnvironment) -> Self {
        Self {
            env,
            periods_per_year: TRADING_PERIODS_PER_YEAR,
            seed: None,
        }
    }

    /// Seed the random policy used when no actions are supplied
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Annualization factor for the Sharpe ratio
    pub fn with_periods_per_year(mut self, periods_per_year: f64) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    /// Run with `actions` (Hold past their end), or uniformly random actions
    /// when none or an empty list is supplied
    pub fn run(self, actions: Option<&[Action]>) -> BacktestReport {
        match actions {
            Some(actions) if !actions.is_empty() => {
                let mut policy = FixedActions::new(actions.to_vec());
                self.run_policy(&mut policy)
            }
            _ => {
                let mut policy = RandomPolicy::new(self.seed);
                self.run_policy(&mut policy)
            }
        }
    }

    /// Run with an externally supplied policy
    pub fn run_policy(self, policy: &mut dyn Policy) -> BacktestReport {
        let env = self.env;
        let mut observation = env.reset();

        let mut total_reward = 0.0;
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut drawdown = DrawdownTracker::new(env.balance());

        for step in 0..env.max_steps() {
            let action = policy.act(&observation, step);
            let result = env.step(action);

            total_reward += result.reward;
            if result.reward > 0.0 {
                wins += 1;
            } else if result.reward < 0.0 {
                losses += 1;
            }
            drawdown.update(env.balance());

            observation = result.observation;
            if result.done {
                break;
            }
        }

        let decided = wins + losses;
        let win_rate = if decided > 0 {
            wins as f64 / decided as f64
        } else {
            0.0
        };

        let returns = period_returns(env.portfolio_values());
        let sharpe = sharpe_ratio(&returns, self.periods_per_year);
        let var_95 = value_at_risk(&returns, VAR_CONFIDENCE);

        let report = BacktestReport {
            total_reward,
            win_rate,
            max_drawdown: drawdown.max_drawdown(),
            final_balance: env.balance(),
            num_trades: decided,
            sharpe_ratio: sharpe,
            var_95,
        };

        info!(
            "Backtest ({}) results: total reward {:.4}, Sharpe {:.2}, VaR 95% {:.4}",
            policy.name(),
            report.total_reward,
            report.sharpe_ratio,
            report.var_95
        );

        report
    }
}
