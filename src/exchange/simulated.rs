use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::info;

use super::traits::{action_direction, OrderExecutor};
use crate::config::{ExecutionConfig, ExecutionMode};
use crate::domain::TradeRecord;
use crate::error::Result;
use crate::rl::core::Action;

/// Records trades at a fixed price without contacting any venue
pub struct SimulatedExecutor {
    symbol: String,
    amount: Decimal,
    price: Decimal,
    trades: RwLock<Vec<TradeRecord>>,
}

impl SimulatedExecutor {
    pub fn new(symbol: impl Into<String>, amount: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            price,
            trades: RwLock::new(Vec::new()),
        }
    }

    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(
            config.symbol.clone(),
            config.order_amount,
            config.simulated_price,
        )
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

#[async_trait]
impl OrderExecutor for SimulatedExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Simulated
    }

    async fn execute(&self, action: Action) -> Result<Option<TradeRecord>> {
        let Some(direction) = action_direction(action) else {
            return Ok(None);
        };

        let trade = TradeRecord::new(
            self.symbol.clone(),
            direction,
            self.amount,
            self.price,
            true,
        );
        info!(
            "[SIM] {} {} {} @ {}",
            direction, trade.amount, trade.symbol, trade.price
        );

        self.trades.write().await.push(trade.clone());
        Ok(Some(trade))
    }

    async fn trades(&self) -> Vec<TradeRecord> {
        self.trades.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeDirection;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_hold_places_nothing() {
        let executor = SimulatedExecutor::from_config(&ExecutionConfig::default());
        assert!(executor.execute(Action::Hold).await.unwrap().is_none());
        assert!(executor.trades().await.is_empty());
    }

    #[tokio::test]
    async fn test_buy_and_sell_recorded_at_fixed_price() {
        let executor = SimulatedExecutor::from_config(&ExecutionConfig::default());

        let buy = executor.execute(Action::Buy).await.unwrap().unwrap();
        assert_eq!(buy.direction, TradeDirection::Long);
        assert_eq!(buy.price, dec!(50000));
        assert_eq!(buy.amount, dec!(0.01));
        assert!(buy.simulated);

        let sell = executor.execute(Action::Sell).await.unwrap().unwrap();
        assert_eq!(sell.direction, TradeDirection::Short);

        let trades = executor.trades().await;
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, buy.id);
        assert!(executor.is_simulated());
    }
}
