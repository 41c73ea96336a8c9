use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::traits::{action_direction, ExchangeGateway, MarketOrder, OrderExecutor};
use crate::config::{ExecutionConfig, ExecutionMode};
use crate::domain::TradeRecord;
use crate::error::{BitHunterError, Result};
use crate::rl::core::Action;

/// Sends market orders through an injected [`ExchangeGateway`]
pub struct LiveExchangeExecutor {
    gateway: Arc<dyn ExchangeGateway>,
    symbol: String,
    amount: Decimal,
    trades: RwLock<Vec<TradeRecord>>,
}

impl LiveExchangeExecutor {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, config: &ExecutionConfig) -> Self {
        Self {
            gateway,
            symbol: config.symbol.clone(),
            amount: config.order_amount,
            trades: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OrderExecutor for LiveExchangeExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Live
    }

    async fn execute(&self, action: Action) -> Result<Option<TradeRecord>> {
        let Some(direction) = action_direction(action) else {
            return Ok(None);
        };

        let order = MarketOrder {
            symbol: self.symbol.clone(),
            side: direction.order_side(),
            amount: self.amount,
        };

        let fill = self.gateway.market_order(order).await.map_err(|e| {
            error!(
                "{} market {} order for {} failed: {}",
                self.gateway.name(),
                direction.order_side(),
                self.symbol,
                e
            );
            BitHunterError::OrderExecution(e.to_string())
        })?;

        info!(
            "{} filled {} {} {} @ {} (order {})",
            self.gateway.name(),
            direction,
            fill.filled_amount,
            self.symbol,
            fill.price,
            fill.order_id
        );

        let trade = TradeRecord::new(
            self.symbol.clone(),
            direction,
            fill.filled_amount,
            fill.price,
            false,
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
    use crate::domain::{OrderSide, TradeDirection};
    use crate::exchange::traits::{GatewayFill, MockExchangeGateway};
    use rust_decimal_macros::dec;

    fn gateway_named(mut mock: MockExchangeGateway) -> MockExchangeGateway {
        mock.expect_name().return_const("mock".to_string());
        mock
    }

    #[tokio::test]
    async fn test_live_buy_uses_gateway_fill() {
        let mut mock = MockExchangeGateway::new();
        mock.expect_market_order()
            .withf(|order| order.side == OrderSide::Buy && order.amount == dec!(0.01))
            .times(1)
            .returning(|_| {
                Ok(GatewayFill {
                    order_id: "abc".to_string(),
                    price: dec!(61000.5),
                    filled_amount: dec!(0.01),
                })
            });

        let executor =
            LiveExchangeExecutor::new(Arc::new(gateway_named(mock)), &ExecutionConfig::default());
        let trade = executor.execute(Action::Buy).await.unwrap().unwrap();

        assert_eq!(trade.direction, TradeDirection::Long);
        assert_eq!(trade.price, dec!(61000.5));
        assert!(!trade.simulated);
        assert!(!executor.is_simulated());
        assert_eq!(executor.trades().await.len(), 1);
    }

    #[tokio::test]
    async fn test_live_hold_skips_gateway() {
        let mut mock = MockExchangeGateway::new();
        mock.expect_market_order().times(0);

        let executor =
            LiveExchangeExecutor::new(Arc::new(gateway_named(mock)), &ExecutionConfig::default());
        assert!(executor.execute(Action::Hold).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_gateway_failure_is_order_execution_error() {
        let mut mock = MockExchangeGateway::new();
        mock.expect_market_order()
            .returning(|_| Err(BitHunterError::Other(anyhow::anyhow!("rejected"))));

        let executor =
            LiveExchangeExecutor::new(Arc::new(gateway_named(mock)), &ExecutionConfig::default());
        let err = executor.execute(Action::Sell).await.unwrap_err();

        assert!(matches!(err, BitHunterError::OrderExecution(_)));
        assert!(executor.trades().await.is_empty());
    }
}
