use std::sync::Arc;

use tracing::info;

use crate::config::{ExecutionConfig, ExecutionMode};
use crate::error::{BitHunterError, Result};

use super::{ExchangeGateway, LiveExchangeExecutor, OrderExecutor, SimulatedExecutor};

/// Create the order executor selected by `execution.mode`.
///
/// Live mode needs a broker gateway; without one it is refused rather than
/// silently falling back to simulation.
pub fn build_executor(
    config: &ExecutionConfig,
    gateway: Option<Arc<dyn ExchangeGateway>>,
) -> Result<Arc<dyn OrderExecutor>> {
    match config.mode {
        ExecutionMode::Simulated => {
            info!(
                "Using simulated execution for {} at fixed price {}",
                config.symbol, config.simulated_price
            );
            Ok(Arc::new(SimulatedExecutor::from_config(config)))
        }
        ExecutionMode::Live => {
            let gateway = gateway.ok_or_else(|| {
                BitHunterError::ExecutionDisabled(
                    "live execution requires an exchange gateway; set execution.mode=simulated"
                        .to_string(),
                )
            })?;
            info!("Using live execution via {} for {}", gateway.name(), config.symbol);
            Ok(Arc::new(LiveExchangeExecutor::new(gateway, config)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::traits::MockExchangeGateway;

    #[test]
    fn build_executor_defaults_to_simulated() {
        let executor = build_executor(&ExecutionConfig::default(), None).unwrap();
        assert!(executor.is_simulated());
    }

    #[test]
    fn build_executor_refuses_live_without_gateway() {
        let config = ExecutionConfig {
            mode: ExecutionMode::Live,
            ..Default::default()
        };
        let result = build_executor(&config, None);
        assert!(matches!(result, Err(BitHunterError::ExecutionDisabled(_))));
    }

    #[test]
    fn build_executor_live_with_gateway() {
        let mut mock = MockExchangeGateway::new();
        mock.expect_name().return_const("mock".to_string());
        let config = ExecutionConfig {
            mode: ExecutionMode::Live,
            ..Default::default()
        };

        let executor = build_executor(&config, Some(Arc::new(mock))).unwrap();
        assert_eq!(executor.mode(), ExecutionMode::Live);
    }
}
