//! Action Space
//!
//! Discrete hold/buy/sell actions consumed by the trading environment.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of discrete actions
pub const NUM_ACTIONS: usize = 3;

/// Discrete action space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Action {
    /// Keep the current position (or stay flat)
    #[default]
    Hold = 0,
    /// Enter a long position
    Buy = 1,
    /// Enter a short position
    Sell = 2,
}

impl Action {
    /// Convert from action index
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Hold),
            1 => Some(Self::Buy),
            2 => Some(Self::Sell),
            _ => None,
        }
    }

    /// Convert to action index
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Get all possible actions
    pub fn all() -> &'static [Action] {
        &[Self::Hold, Self::Buy, Self::Sell]
    }

    /// Uniform sample over the action space
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::all()[rng.gen_range(0..NUM_ACTIONS)]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hold => "hold",
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl From<usize> for Action {
    fn from(action: usize) -> Self {
        Self::from_index(action).unwrap_or(Self::Hold)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim().to_ascii_lowercase();
        match raw.as_str() {
            "hold" | "h" => Ok(Self::Hold),
            "buy" | "long" | "b" => Ok(Self::Buy),
            "sell" | "short" | "s" => Ok(Self::Sell),
            other => other
                .parse::<usize>()
                .ok()
                .and_then(Self::from_index)
                .ok_or_else(|| format!("invalid action '{}'; expected hold|buy|sell or 0|1|2", raw)),
        }
    }
}
