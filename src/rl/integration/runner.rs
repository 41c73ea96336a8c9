//! Policy Runner
//!
//! Derives an action from the environment's latest observation and submits
//! it through an [`OrderExecutor`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::TradeRecord;
use crate::error::Result;
use crate::exchange::OrderExecutor;
use crate::rl::core::Action;
use crate::rl::environment::TradingEnvironment;
use crate::rl::policy::Policy;

/// Outcome of one decision
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerStep {
    pub step: usize,
    pub action: Action,
    pub trade: Option<TradeRecord>,
}

/// Drives a policy against an order executor
pub struct PolicyRunner<P: Policy> {
    policy: P,
    executor: Arc<dyn OrderExecutor>,
}

impl<P: Policy> PolicyRunner<P> {
    pub fn new(policy: P, executor: Arc<dyn OrderExecutor>) -> Self {
        Self { policy, executor }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn executor(&self) -> &Arc<dyn OrderExecutor> {
        &self.executor
    }

    /// Predict from the current observation, then place the trade
    pub async fn run_once(&mut self, env: &TradingEnvironment) -> Result<RunnerStep> {
        let step = env.current_step();
        let action = self.policy.act(&env.observation(), step);
        let trade = self.executor.execute(action).await?;

        debug!(
            "runner step={} action={} traded={}",
            step,
            action,
            trade.is_some()
        );

        Ok(RunnerStep {
            step,
            action,
            trade,
        })
    }

    /// Replay a full episode, executing every decision and advancing the
    /// environment with it. Stops at the first execution error.
    pub async fn replay(&mut self, env: &mut TradingEnvironment) -> Result<Vec<RunnerStep>> {
        env.reset();
        let mut steps = Vec::with_capacity(env.max_steps());

        while !env.is_done() {
            let decision = self.run_once(env).await?;
            env.step(decision.action);
            steps.push(decision);
        }

        let traded = steps.iter().filter(|s| s.trade.is_some()).count();
        info!(
            "Runner ({}) replayed {} steps, {} trades via {} execution",
            self.policy.name(),
            steps.len(),
            traded,
            self.executor.mode()
        );

        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvironmentConfig, ExecutionConfig};
    use crate::domain::{generate_sample_series, TradeDirection};
    use crate::exchange::SimulatedExecutor;
    use crate::rl::policy::FixedActions;

    fn env() -> TradingEnvironment {
        let series = generate_sample_series(6, 0.01, Some(3));
        TradingEnvironment::new(&series, EnvironmentConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_run_once_uses_current_step() {
        let env = env();
        let executor = Arc::new(SimulatedExecutor::from_config(&ExecutionConfig::default()));
        let mut runner = PolicyRunner::new(FixedActions::new(vec![Action::Sell]), executor);

        let step = runner.run_once(&env).await.unwrap();
        assert_eq!(step.step, 0);
        assert_eq!(step.action, Action::Sell);
        assert_eq!(step.trade.unwrap().direction, TradeDirection::Short);
    }

    #[tokio::test]
    async fn test_replay_executes_each_decision() {
        let mut env = env();
        let executor = Arc::new(SimulatedExecutor::from_config(&ExecutionConfig::default()));
        let actions = vec![Action::Buy, Action::Hold, Action::Sell];
        let mut runner = PolicyRunner::new(FixedActions::new(actions), executor.clone());

        let steps = runner.replay(&mut env).await.unwrap();

        assert_eq!(steps.len(), env.max_steps());
        assert!(env.is_done());
        assert_eq!(executor.trades().await.len(), 2);
        assert!(steps[1].trade.is_none());
    }
}
