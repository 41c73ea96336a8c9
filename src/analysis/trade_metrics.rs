use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{TradeDirection, TradeRecord};
use crate::error::{BitHunterError, Result};

/// Aggregate statistics over executed trades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub total_trades: usize,
    /// Percentage of trades with positive profit (0-100)
    pub win_rate: Decimal,
    pub total_profit: Decimal,
    pub avg_profit: Decimal,
}

impl TradeMetrics {
    pub fn from_trades(trades: &[TradeRecord]) -> Result<Self> {
        if trades.is_empty() {
            return Err(BitHunterError::validation("no trades"));
        }

        let profits: Vec<Decimal> = trades.iter().map(trade_profit).collect();
        let total_trades = trades.len();
        let count = Decimal::from(total_trades);
        let wins = profits.iter().filter(|p| **p > Decimal::ZERO).count();
        let total_profit: Decimal = profits.iter().copied().sum();

        Ok(Self {
            total_trades,
            win_rate: Decimal::from(wins) / count * Decimal::ONE_HUNDRED,
            total_profit,
            avg_profit: total_profit / count,
        })
    }
}

/// Recorded profit, or for simulated trades +1% (long) / -1% (short) of notional
pub fn trade_profit(trade: &TradeRecord) -> Decimal {
    if let Some(profit) = trade.profit {
        return profit;
    }
    if !trade.simulated {
        return Decimal::ZERO;
    }
    let one_percent = trade.notional() / Decimal::ONE_HUNDRED;
    match trade.direction {
        TradeDirection::Long => one_percent,
        TradeDirection::Short => -one_percent,
    }
}
