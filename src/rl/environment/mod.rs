//! Simulated Trading Environment
//!
//! Gym-like environment over a historical series, the cash/position ledger it
//! drives, and a backtest engine that replays whole episodes.

mod backtest;
mod ledger;
mod trading;

pub use backtest::{BacktestEngine, BacktestReport, VAR_CONFIDENCE};
pub use ledger::{ExitEvent, ExitReason, Fill, PositionLedger, DEFAULT_COMMISSION_RATE};
pub use trading::{StepInfo, StepResult, TradingEnvironment};
