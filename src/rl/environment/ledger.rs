//! Position Ledger
//!
//! Holds at most one single-unit position plus the cash balance, applies
//! commission on every leg and enforces stop-loss/take-profit exits.
//!
//! Transitions: `Flat -> Long -> Flat`, `Flat -> Short -> Flat`, and a direct
//! flip when the opposite entry is requested while a side is held.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EnvironmentConfig;
use crate::domain::{Position, PositionSide};
use crate::rl::core::Action;

/// Commission per entry/exit leg (0.1%)
pub const DEFAULT_COMMISSION_RATE: f64 = 0.001;

/// Why a position was force-closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
}

/// A forced exit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitEvent {
    pub reason: ExitReason,
    pub side: PositionSide,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl_fraction: f64,
}

/// An executed entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Side held after the fill
    pub side: PositionSide,
    pub price: f64,
    /// Signed change to the cash balance
    pub cash_delta: f64,
}

/// Cash and position bookkeeping for one episode
#[derive(Debug, Clone)]
pub struct PositionLedger {
    balance: f64,
    position: Position,
    commission_rate: f64,
    stop_loss: f64,
    take_profit: f64,
    realized_pnl: f64,
    closed_trades: usize,
    entries: usize,
}

impl PositionLedger {
    pub fn new(initial_balance: f64, commission_rate: f64, stop_loss: f64, take_profit: f64) -> Self {
        Self {
            balance: initial_balance,
            position: Position::Flat,
            commission_rate,
            stop_loss,
            take_profit,
            realized_pnl: 0.0,
            closed_trades: 0,
            entries: 0,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(
            config.initial_balance,
            config.commission_rate,
            config.stop_loss,
            config.take_profit,
        )
    }

    /// Clear the position and statistics, restoring `balance`
    pub fn reset(&mut self, balance: f64) {
        self.balance = balance;
        self.position = Position::Flat;
        self.realized_pnl = 0.0;
        self.closed_trades = 0;
        self.entries = 0;
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn side(&self) -> PositionSide {
        self.position.side()
    }

    pub fn entry_price(&self) -> Option<f64> {
        self.position.entry_price()
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    /// Realized P&L of closed legs this episode (cash units)
    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn closed_trades(&self) -> usize {
        self.closed_trades
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn unrealized_pnl_fraction(&self, price: f64) -> Option<f64> {
        self.position.pnl_fraction(price)
    }

    /// Force-close the open position if `price` crosses stop-loss or take-profit.
    pub fn check_exit(&mut self, price: f64) -> Option<ExitEvent> {
        let pnl_fraction = self.position.pnl_fraction(price)?;

        let reason = if pnl_fraction <= -self.stop_loss {
            ExitReason::StopLoss
        } else if pnl_fraction >= self.take_profit {
            ExitReason::TakeProfit
        } else {
            return None;
        };

        let side = self.position.side();
        let entry_price = self.position.entry_price()?;
        self.close_at(price);

        let event = ExitEvent {
            reason,
            side,
            entry_price,
            exit_price: price,
            pnl_fraction,
        };
        info!(
            "Auto-exit {:?} on {} @ {:.4} (entry {:.4}, pnl {:.2}%)",
            reason,
            side,
            price,
            entry_price,
            pnl_fraction * 100.0
        );
        Some(event)
    }

    /// Open a long unit. No-op when already long or when cash cannot cover
    /// price plus commission.
    pub fn enter_long(&mut self, price: f64) -> Option<Fill> {
        if matches!(self.position, Position::Long { .. }) {
            return None;
        }

        let cost = price * (1.0 + self.commission_rate);
        if self.balance < cost {
            warn!(
                "Skipping long entry: balance {:.2} below cost {:.2}",
                self.balance, cost
            );
            return None;
        }

        if let Position::Short { entry_price } = self.position {
            self.book_close(entry_price * (1.0 - self.commission_rate) - cost);
        }

        self.balance -= cost;
        self.position = Position::Long { entry_price: price };
        self.entries += 1;

        Some(Fill {
            side: PositionSide::Long,
            price,
            cash_delta: -cost,
        })
    }

    /// Open a short unit. No-op when already short; proceeds are credited
    /// without any balance or margin check.
    pub fn enter_short(&mut self, price: f64) -> Option<Fill> {
        if matches!(self.position, Position::Short { .. }) {
            return None;
        }

        let proceeds = price * (1.0 - self.commission_rate);

        if let Position::Long { entry_price } = self.position {
            self.book_close(proceeds - entry_price * (1.0 + self.commission_rate));
        }

        self.balance += proceeds;
        self.position = Position::Short { entry_price: price };
        self.entries += 1;

        Some(Fill {
            side: PositionSide::Short,
            price,
            cash_delta: proceeds,
        })
    }

    /// Route an environment action to the matching entry
    pub fn apply(&mut self, action: Action, price: f64) -> Option<Fill> {
        match action {
            Action::Hold => None,
            Action::Buy => self.enter_long(price),
            Action::Sell => self.enter_short(price),
        }
    }

    fn close_at(&mut self, price: f64) {
        match self.position {
            Position::Flat => {}
            Position::Long { entry_price } => {
                let proceeds = price * (1.0 - self.commission_rate);
                self.balance += proceeds;
                self.book_close(proceeds - entry_price * (1.0 + self.commission_rate));
            }
            Position::Short { entry_price } => {
                let cost = price * (1.0 + self.commission_rate);
                self.balance -= cost;
                self.book_close(entry_price * (1.0 - self.commission_rate) - cost);
            }
        }
        self.position = Position::Flat;
    }

    fn book_close(&mut self, pnl: f64) {
        self.realized_pnl += pnl;
        self.closed_trades += 1;
    }
}
