//! Core RL abstractions
//!
//! Fundamental types for state representation, actions, and rewards.

pub mod action;
pub mod reward;
pub mod state;

pub use action::{Action, NUM_ACTIONS};
pub use reward::{RewardSignal, RewardTransition, ShapedReward};
pub use state::{FeatureBounds, FeaturePipeline, Observation, OBSERVATION_DIM};
