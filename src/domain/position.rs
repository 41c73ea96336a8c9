use serde::{Deserialize, Serialize};

/// Which way the agent is exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    #[default]
    Flat,
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Flat => "flat",
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single open position; an entry price exists only while a side is held
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "side", rename_all = "lowercase")]
pub enum Position {
    #[default]
    Flat,
    Long { entry_price: f64 },
    Short { entry_price: f64 },
}

impl Position {
    pub fn side(&self) -> PositionSide {
        match self {
            Position::Flat => PositionSide::Flat,
            Position::Long { .. } => PositionSide::Long,
            Position::Short { .. } => PositionSide::Short,
        }
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self {
            Position::Flat => None,
            Position::Long { entry_price } | Position::Short { entry_price } => Some(*entry_price),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Position::Flat)
    }

    /// Unrealized return relative to entry, sign-flipped for shorts
    pub fn pnl_fraction(&self, price: f64) -> Option<f64> {
        match self {
            Position::Flat => None,
            Position::Long { entry_price } => Some((price - entry_price) / entry_price),
            Position::Short { entry_price } => Some((entry_price - price) / entry_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_has_no_entry() {
        let position = Position::Flat;
        assert_eq!(position.side(), PositionSide::Flat);
        assert_eq!(position.entry_price(), None);
        assert_eq!(position.pnl_fraction(100.0), None);
    }

    #[test]
    fn test_pnl_fraction_sign() {
        let long = Position::Long { entry_price: 100.0 };
        let short = Position::Short { entry_price: 100.0 };
        assert!((long.pnl_fraction(110.0).unwrap() - 0.1).abs() < 1e-12);
        assert!((short.pnl_fraction(110.0).unwrap() + 0.1).abs() < 1e-12);
    }
}
