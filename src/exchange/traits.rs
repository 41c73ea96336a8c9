use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ExecutionMode;
use crate::domain::{OrderSide, TradeDirection, TradeRecord};
use crate::error::Result;
use crate::rl::core::Action;

/// Market order handed to a broker gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub amount: Decimal,
}

/// Broker acknowledgement of a filled market order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayFill {
    pub order_id: String,
    pub price: Decimal,
    pub filled_amount: Decimal,
}

/// Broker adapter used by live execution.
///
/// No implementation ships with the crate; callers inject one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    fn name(&self) -> String;

    async fn market_order(&self, order: MarketOrder) -> Result<GatewayFill>;
}

/// Turns discrete actions into executed trades
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    fn mode(&self) -> ExecutionMode;

    fn is_simulated(&self) -> bool {
        self.mode() == ExecutionMode::Simulated
    }

    /// Execute `action`. `Hold` places nothing and yields `Ok(None)`.
    async fn execute(&self, action: Action) -> Result<Option<TradeRecord>>;

    /// Trades executed so far, oldest first
    async fn trades(&self) -> Vec<TradeRecord>;
}

/// Trade direction requested by `action`, `None` for `Hold`
pub fn action_direction(action: Action) -> Option<TradeDirection> {
    match action {
        Action::Hold => None,
        Action::Buy => Some(TradeDirection::Long),
        Action::Sell => Some(TradeDirection::Short),
    }
}
