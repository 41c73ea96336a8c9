//! Reward Functions
//!
//! The step reward blends three terms:
//! - price-following: mark-to-market return of the held side, in percent
//! - behavior: a penalty for holding a position that is under water
//! - portfolio risk: a continuous tax on cash drawdown from the initial balance
//!
//! A forced stop-loss/take-profit exit adds its realized return on top.

use serde::{Deserialize, Serialize};

use super::action::Action;
use crate::domain::Position;

/// Scale from fractional return to reward units
pub const RETURN_SCALE: f64 = 100.0;

/// Scale from fractional drawdown to risk penalty
pub const RISK_SCALE: f64 = 10.0;

/// Default penalty for holding a losing position
pub const DEFAULT_HOLD_PENALTY: f64 = 0.1;

/// Reward signal components
///
/// Keeping the terms apart makes it visible which one drives the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardSignal {
    /// Realized return of a forced exit, scaled
    pub exit_reward: f64,
    /// Mark-to-market return of the held side, scaled
    pub mark_to_market: f64,
    /// Penalty for holding into a loss (positive number, subtracted)
    pub hold_penalty: f64,
    /// Drawdown tax (positive number, subtracted)
    pub risk_penalty: f64,
    /// Total reward
    pub total: f64,
}

impl RewardSignal {
    /// Create a zero reward signal
    pub fn zero() -> Self {
        Self::default()
    }

    /// Recompute the total from the components
    pub fn calculate_total(&mut self) {
        self.total = self.exit_reward + self.mark_to_market - self.hold_penalty - self.risk_penalty;
    }
}

/// Everything the reward needs about one step
#[derive(Debug, Clone, Copy)]
pub struct RewardTransition {
    /// Action requested this step
    pub action: Action,
    /// Position after the action was applied
    pub position: Position,
    /// Price at the current step
    pub current_price: f64,
    /// Price at the next step (current price on the last step)
    pub next_price: f64,
    /// Return of a position force-closed this step
    pub exit_pnl_fraction: Option<f64>,
    pub initial_balance: f64,
    /// Cash balance after the action
    pub balance: f64,
}

/// Shaped multi-term reward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedReward {
    hold_penalty: f64,
}

impl Default for ShapedReward {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_PENALTY)
    }
}

impl ShapedReward {
    pub fn new(hold_penalty: f64) -> Self {
        Self { hold_penalty }
    }

    pub fn hold_penalty(&self) -> f64 {
        self.hold_penalty
    }

    pub fn compute(&self, t: &RewardTransition) -> RewardSignal {
        let mut signal = RewardSignal::zero();

        if let Some(pnl) = t.exit_pnl_fraction {
            signal.exit_reward = pnl * RETURN_SCALE;
        }

        signal.mark_to_market = mark_to_market(&t.position, t.current_price, t.next_price);

        if t.action == Action::Hold {
            if let Some(pnl) = t.position.pnl_fraction(t.current_price) {
                if pnl < 0.0 {
                    signal.hold_penalty = self.hold_penalty;
                }
            }
        }

        signal.risk_penalty = risk_penalty(t.initial_balance, t.balance);

        signal.calculate_total();
        signal
    }
}

/// Scaled one-step return of the held side
pub fn mark_to_market(position: &Position, current_price: f64, next_price: f64) -> f64 {
    match position {
        Position::Flat => 0.0,
        Position::Long { .. } => (next_price - current_price) / current_price * RETURN_SCALE,
        Position::Short { .. } => (current_price - next_price) / current_price * RETURN_SCALE,
    }
}

/// Drawdown tax on cash below the initial balance; never negative
pub fn risk_penalty(initial_balance: f64, balance: f64) -> f64 {
    ((initial_balance - balance) / initial_balance * RISK_SCALE).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(action: Action, position: Position) -> RewardTransition {
        RewardTransition {
            action,
            position,
            current_price: 100.0,
            next_price: 110.0,
            exit_pnl_fraction: None,
            initial_balance: 10_000.0,
            balance: 10_000.0,
        }
    }

    #[test]
    fn test_flat_hold_is_zero() {
        let signal = ShapedReward::default().compute(&transition(Action::Hold, Position::Flat));
        assert_eq!(signal, RewardSignal::zero());
    }

    #[test]
    fn test_mark_to_market_sign() {
        let long = Position::Long { entry_price: 100.0 };
        let short = Position::Short { entry_price: 100.0 };
        assert!((mark_to_market(&long, 100.0, 110.0) - 10.0).abs() < 1e-9);
        assert!((mark_to_market(&short, 100.0, 110.0) + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_hold_penalty_only_when_losing() {
        let shaper = ShapedReward::default();

        let losing = transition(Action::Hold, Position::Long { entry_price: 120.0 });
        assert_eq!(shaper.compute(&losing).hold_penalty, DEFAULT_HOLD_PENALTY);

        let winning = transition(Action::Hold, Position::Long { entry_price: 90.0 });
        assert_eq!(shaper.compute(&winning).hold_penalty, 0.0);

        // Not a hold action: no penalty even when losing
        let buy = transition(Action::Buy, Position::Long { entry_price: 120.0 });
        assert_eq!(shaper.compute(&buy).hold_penalty, 0.0);
    }

    #[test]
    fn test_risk_penalty_never_negative() {
        assert_eq!(risk_penalty(10_000.0, 12_000.0), 0.0);
        assert!((risk_penalty(10_000.0, 9_000.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_combines_terms() {
        let mut t = transition(Action::Hold, Position::Short { entry_price: 95.0 });
        t.exit_pnl_fraction = Some(0.1);
        t.balance = 9_500.0;
        let signal = ShapedReward::new(0.5).compute(&t);

        // exit 10, short into a rise -10, losing hold 0.5, drawdown 0.5
        assert!((signal.total - (10.0 - 10.0 - 0.5 - 0.5)).abs() < 1e-9);
    }
}
