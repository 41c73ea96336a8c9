//! Policies
//!
//! A policy maps an observation to an action. Trained models live outside
//! this crate; callers inject them through [`Policy`] (for example with
//! [`PolicyFn`]) instead of the environment owning or caching a model.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::rl::core::{Action, Observation};

/// Decision function driving an episode
pub trait Policy: Send {
    /// Choose the action for `step` given the observation at that step
    fn act(&mut self, observation: &Observation, step: usize) -> Action;

    fn name(&self) -> &'static str {
        "policy"
    }
}

/// Replays a fixed action sequence, holding once it is exhausted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedActions {
    actions: Vec<Action>,
}

impl FixedActions {
    pub fn new(actions: impl Into<Vec<Action>>) -> Self {
        Self {
            actions: actions.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Policy for FixedActions {
    fn act(&mut self, _observation: &Observation, step: usize) -> Action {
        self.actions.get(step).copied().unwrap_or(Action::Hold)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Uniformly random actions
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    /// Seeded for reproducible runs, entropy-backed otherwise
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation, _step: usize) -> Action {
        Action::sample(&mut self.rng)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Adapts a closure (e.g. a call into an external model) into a [`Policy`]
pub struct PolicyFn<F>(pub F);

impl<F> Policy for PolicyFn<F>
where
    F: FnMut(&Observation, usize) -> Action + Send,
{
    fn act(&mut self, observation: &Observation, step: usize) -> Action {
        (self.0)(observation, step)
    }

    fn name(&self) -> &'static str {
        "external"
    }
}
