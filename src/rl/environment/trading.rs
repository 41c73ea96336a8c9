//! Trading Environment for RL Training
//!
//! Provides a gym-like interface with step/reset over a historical
//! price/volume/sentiment series.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::backtest::{BacktestEngine, BacktestReport};
use super::ledger::{ExitEvent, Fill, PositionLedger};
use crate::config::EnvironmentConfig;
use crate::domain::{MarketSeries, Position, PriceSample, SentimentSample};
use crate::error::{BitHunterError, Result};
use crate::rl::core::{
    Action, FeaturePipeline, Observation, RewardSignal, RewardTransition, ShapedReward,
    NUM_ACTIONS, OBSERVATION_DIM,
};

/// Additional step information
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Cash balance after the step
    pub balance: f64,
    /// Position after the step
    pub position: Position,
    /// Reward components
    pub reward: RewardSignal,
    /// Forced exit evaluated before the action, if any
    pub exit: Option<ExitEvent>,
    /// Entry executed for the action, if any
    pub fill: Option<Fill>,
}

/// Result of taking a step in the environment
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Observation after the step
    pub observation: Observation,
    /// Reward signal
    pub reward: f64,
    /// Whether the episode is over
    pub done: bool,
    /// Additional info
    pub info: StepInfo,
}

/// Trading environment for RL training
#[derive(Debug, Clone)]
pub struct TradingEnvironment {
    config: EnvironmentConfig,
    features: FeaturePipeline,
    ledger: PositionLedger,
    reward_fn: ShapedReward,
    current_step: usize,
    max_steps: usize,
    total_reward: f64,
    portfolio_values: Vec<f64>,
}

impl TradingEnvironment {
    /// Create an environment over a validated series
    pub fn new(series: &MarketSeries, config: EnvironmentConfig) -> Result<Self> {
        Self::from_samples(series.prices(), series.sentiment(), config)
    }

    /// Create an environment from raw aligned samples.
    ///
    /// Fails before any simulation on empty or misaligned series and on
    /// invalid parameters.
    pub fn from_samples(
        prices: &[PriceSample],
        sentiment: &[SentimentSample],
        config: EnvironmentConfig,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|errors| BitHunterError::Validation(errors.join("; ")))?;

        let features = FeaturePipeline::new(prices, sentiment)?;
        let max_steps = features.len() - 1;

        let mut env = Self {
            config,
            ledger: PositionLedger::from_config(&config),
            reward_fn: ShapedReward::new(config.hold_penalty),
            features,
            current_step: 0,
            max_steps,
            total_reward: 0.0,
            portfolio_values: Vec::new(),
        };
        env.reset();
        Ok(env)
    }

    /// Reset the environment for a new episode
    pub fn reset(&mut self) -> Observation {
        self.ledger.reset(self.config.initial_balance);
        self.current_step = 0;
        self.total_reward = 0.0;
        self.portfolio_values.clear();
        self.portfolio_values.push(self.config.initial_balance);

        self.observation()
    }

    /// Take a step in the environment
    pub fn step(&mut self, action: Action) -> StepResult {
        if self.current_step >= self.max_steps {
            return StepResult {
                observation: self.observation(),
                reward: 0.0,
                done: true,
                info: StepInfo {
                    balance: self.ledger.balance(),
                    position: self.ledger.position(),
                    ..Default::default()
                },
            };
        }

        let current_price = self.price_at(self.current_step);
        let next_price = self
            .features
            .price(self.current_step + 1)
            .unwrap_or(current_price);

        // Stop-loss / take-profit run before the requested action
        let exit = self.ledger.check_exit(current_price);
        let fill = self.ledger.apply(action, current_price);

        let signal = self.reward_fn.compute(&RewardTransition {
            action,
            position: self.ledger.position(),
            current_price,
            next_price,
            exit_pnl_fraction: exit.map(|e| e.pnl_fraction),
            initial_balance: self.config.initial_balance,
            balance: self.ledger.balance(),
        });

        self.total_reward += signal.total;
        self.portfolio_values.push(self.ledger.balance());

        self.current_step += 1;
        let done = self.current_step >= self.max_steps;

        debug!(
            "step={} action={} reward={:.4} balance={:.2} position={}",
            self.current_step,
            action,
            signal.total,
            self.ledger.balance(),
            self.ledger.side()
        );

        StepResult {
            observation: self.observation(),
            reward: signal.total,
            done,
            info: StepInfo {
                balance: self.ledger.balance(),
                position: self.ledger.position(),
                reward: signal,
                exit,
                fill,
            },
        }
    }

    /// Replay `actions` (or random actions) over a fresh episode
    pub fn backtest(&mut self, actions: Option<&[Action]>) -> BacktestReport {
        BacktestEngine::new(self).run(actions)
    }

    /// Human-readable snapshot of the current state
    pub fn render(&self) -> String {
        let entry = self
            .ledger
            .entry_price()
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "None".to_string());
        format!(
            "Step: {}, Balance: {:.2}, Position: {}, Price: {:.2}, Entry Price: {}, Total Reward: {:.2}",
            self.current_step,
            self.ledger.balance(),
            self.ledger.side(),
            self.price_at(self.current_step),
            entry,
            self.total_reward
        )
    }

    /// Get current observation as feature vector
    pub fn observation(&self) -> Observation {
        self.features
            .observe(self.current_step, self.ledger.balance() / self.config.initial_balance)
    }

    /// Get observation dimension
    pub fn observation_dim(&self) -> usize {
        OBSERVATION_DIM
    }

    /// Get action dimension
    pub fn action_dim(&self) -> usize {
        NUM_ACTIONS
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn features(&self) -> &FeaturePipeline {
        &self.features
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    pub fn balance(&self) -> f64 {
        self.ledger.balance()
    }

    pub fn position(&self) -> Position {
        self.ledger.position()
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn is_done(&self) -> bool {
        self.current_step >= self.max_steps
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Cash balance after reset and after every step
    pub fn portfolio_values(&self) -> &[f64] {
        &self.portfolio_values
    }

    fn price_at(&self, step: usize) -> f64 {
        // max_steps < len, so every reachable step has a price
        self.features.price(step.min(self.max_steps)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PositionSide;

    fn env_from(prices: &[f64]) -> TradingEnvironment {
        let samples: Vec<PriceSample> = prices.iter().map(|p| PriceSample::new(*p, 1.0)).collect();
        let sentiment = vec![SentimentSample::new(0.0); prices.len()];
        TradingEnvironment::from_samples(&samples, &sentiment, EnvironmentConfig::default())
            .unwrap()
    }

    #[test]
    fn test_env_creation() {
        let env = env_from(&[100.0, 101.0, 102.0]);

        assert_eq!(env.observation_dim(), 7);
        assert_eq!(env.action_dim(), 3);
        assert_eq!(env.max_steps(), 2);
        assert_eq!(env.portfolio_values(), &[10_000.0]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let samples = vec![PriceSample::new(1.0, 1.0)];
        let sentiment = vec![SentimentSample::new(0.0)];
        let config = EnvironmentConfig {
            initial_balance: 0.0,
            ..Default::default()
        };
        let err = TradingEnvironment::from_samples(&samples, &sentiment, config).unwrap_err();
        assert!(matches!(err, BitHunterError::Validation(_)));
    }

    #[test]
    fn test_env_reset_idempotent() {
        let mut env = env_from(&[100.0, 110.0, 105.0, 120.0]);

        let first = env.reset();
        env.step(Action::Buy);
        env.step(Action::Sell);
        let second = env.reset();
        let third = env.reset();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(env.balance(), 10_000.0);
        assert_eq!(env.current_step(), 0);
        assert_eq!(env.total_reward(), 0.0);
        assert_eq!(env.position(), Position::Flat);
    }

    #[test]
    fn test_env_step_hold() {
        let mut env = env_from(&[100.0, 101.0, 102.0]);
        let result = env.step(Action::Hold);

        assert!(!result.done);
        assert_eq!(result.reward, 0.0);
        assert_eq!(env.current_step(), 1);
        assert_eq!(env.portfolio_values().len(), 2);
    }

    #[test]
    fn test_terminal_step_idempotent() {
        let mut env = env_from(&[100.0, 101.0]);
        let last = env.step(Action::Buy);
        assert!(last.done);

        let balance = env.balance();
        for action in [Action::Hold, Action::Buy, Action::Sell] {
            let result = env.step(action);
            assert!(result.done);
            assert_eq!(result.reward, 0.0);
            assert_eq!(result.observation, last.observation);
        }
        assert_eq!(env.balance(), balance);
        assert_eq!(env.portfolio_values().len(), 2);
    }

    #[test]
    fn test_single_sample_episode_is_done() {
        let mut env = env_from(&[100.0]);
        assert!(env.is_done());
        let result = env.step(Action::Buy);
        assert!(result.done);
        assert_eq!(env.position(), Position::Flat);
    }

    #[test]
    fn test_stop_loss_before_action() {
        let mut env = env_from(&[100.0, 94.0, 93.0, 92.0]);
        env.step(Action::Buy);
        assert_eq!(env.position().side(), PositionSide::Long);

        // 6% adverse move: closed before the hold is evaluated
        let result = env.step(Action::Hold);
        let exit = result.info.exit.expect("stop-loss should fire");
        assert_eq!(exit.side, PositionSide::Long);
        assert_eq!(env.position(), Position::Flat);
        assert!((result.info.reward.exit_reward - (-6.0)).abs() < 1e-9);
        assert_eq!(result.info.reward.hold_penalty, 0.0);
    }

    #[test]
    fn test_hold_penalty_on_losing_position() {
        let mut env = env_from(&[100.0, 98.0, 97.0]);
        env.step(Action::Buy);
        let result = env.step(Action::Hold);

        assert!(result.info.exit.is_none());
        assert_eq!(result.info.reward.hold_penalty, 0.1);
    }

    #[test]
    fn test_risk_penalty_every_step() {
        let mut env = env_from(&[1_000.0, 1_000.0, 1_000.0]);
        env.step(Action::Buy);
        let result = env.step(Action::Hold);

        // Cash is down by one unit plus commission
        let expected = 1_001.0 / 10_000.0 * 10.0;
        assert!((result.info.reward.risk_penalty - expected).abs() < 1e-9);
        assert!(result.reward < 0.0);
    }

    #[test]
    fn test_render_mentions_state() {
        let mut env = env_from(&[100.0, 101.0, 102.0]);
        env.step(Action::Buy);
        let text = env.render();

        assert!(text.contains("Step: 1"));
        assert!(text.contains("Position: long"));
        assert!(text.contains("Entry Price: 100.00"));
    }
}
