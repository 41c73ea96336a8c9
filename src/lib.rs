pub mod analysis;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod rl;

pub use analysis::TradeMetrics;
pub use config::{AppConfig, EnvironmentConfig, ExecutionConfig, ExecutionMode};
pub use domain::{
    generate_sample_series, MarketSeries, Position, PositionSide, PriceSample, SentimentSample,
    TradeDirection, TradeRecord,
};
pub use error::{BitHunterError, Result};
pub use exchange::{build_executor, ExchangeGateway, OrderExecutor};
pub use rl::{
    Action, BacktestEngine, BacktestReport, FeaturePipeline, Observation, Policy, PolicyRunner,
    PositionLedger, StepResult, TradingEnvironment,
};
