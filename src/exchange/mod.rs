pub mod factory;
mod live;
mod simulated;
mod traits;

pub use factory::build_executor;
pub use live::LiveExchangeExecutor;
pub use simulated::SimulatedExecutor;
pub use traits::{action_direction, ExchangeGateway, GatewayFill, MarketOrder, OrderExecutor};
