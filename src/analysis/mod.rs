//! Performance analysis
//!
//! Risk statistics over balance curves and aggregate metrics over executed
//! trades.

pub mod performance;
pub mod trade_metrics;

pub use performance::{
    percentile, period_returns, sharpe_ratio, value_at_risk, DrawdownTracker,
    TRADING_PERIODS_PER_YEAR,
};
pub use trade_metrics::{trade_profit, TradeMetrics};
