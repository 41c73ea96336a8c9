//! Reinforcement Learning Module
//!
//! Trading environment for discrete-action agents.
//!
//! # Features
//!
//! - **State Representation**: 7 min-max normalized features per step
//! - **Action Space**: Discrete (Hold/Buy/Sell)
//! - **Reward Shaping**: exit P&L, mark-to-market, hold and drawdown penalties
//! - **Backtesting**: Sharpe ratio, 95% VaR and max drawdown per episode
//! - **Execution**: bridge from a policy to simulated or live order execution

pub mod core;
pub mod environment;
pub mod integration;
pub mod policy;

// Core exports
pub use core::{
    Action, FeatureBounds, FeaturePipeline, Observation, RewardSignal, RewardTransition,
    ShapedReward, NUM_ACTIONS, OBSERVATION_DIM,
};

// Environment exports
pub use environment::{
    BacktestEngine, BacktestReport, ExitEvent, ExitReason, Fill, PositionLedger, StepInfo,
    StepResult, TradingEnvironment,
};

// Policy exports
pub use policy::{FixedActions, Policy, PolicyFn, RandomPolicy};

// Integration exports
pub use integration::PolicyRunner;
