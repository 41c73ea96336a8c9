//! State Representation
//!
//! Precomputes indicator series (SMA5, SMA10, RSI14) and min-max bounds over a
//! full price/sentiment history, then serves the 7-feature observation for any
//! step of an episode.

use serde::{Deserialize, Serialize};

use crate::domain::{validate_alignment, PriceSample, SentimentSample};
use crate::error::Result;

/// Number of features in one observation
pub const OBSERVATION_DIM: usize = 7;

/// Short moving-average window
pub const SMA_SHORT_WINDOW: usize = 5;

/// Long moving-average window
pub const SMA_LONG_WINDOW: usize = 10;

/// RSI lookback
pub const RSI_PERIOD: usize = 14;

/// RSI assigned before a full lookback window is available
pub const RSI_NEUTRAL: f64 = 50.0;

/// RS used when a window has no losing moves
pub const RSI_NO_LOSS_RS: f64 = 100.0;

/// Widening applied to degenerate (constant) feature bounds
pub const BOUNDS_EPSILON: f64 = 1e-6;

/// Normalized observation:
/// `[price, volume, sentiment, balance, sma5, sma10, rsi]`
pub type Observation = [f32; OBSERVATION_DIM];

/// Index of each feature inside an [`Observation`]
pub mod feature {
    pub const PRICE: usize = 0;
    pub const VOLUME: usize = 1;
    pub const SENTIMENT: usize = 2;
    pub const BALANCE: usize = 3;
    pub const SMA_SHORT: usize = 4;
    pub const SMA_LONG: usize = 5;
    pub const RSI: usize = 6;
}

/// Min-max bounds for one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureBounds {
    pub min: f64,
    pub max: f64,
}

impl FeatureBounds {
    /// Fixed bounds, widened if degenerate
    pub fn fixed(min: f64, max: f64) -> Self {
        if max == min {
            Self {
                min: min - BOUNDS_EPSILON,
                max: max + BOUNDS_EPSILON,
            }
        } else {
            Self { min, max }
        }
    }

    /// Bounds spanning `values`. Callers guarantee `values` is non-empty.
    pub fn from_values(values: &[f64]) -> Self {
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        Self::fixed(min, max)
    }

    /// `(x - min) / (max - min)`, not clamped
    pub fn normalize(&self, x: f64) -> f64 {
        (x - self.min) / (self.max - self.min)
    }
}

/// Trailing simple moving average; the first `window - 1` entries hold the
/// first value of the series.
pub fn sma_padded(values: &[f64], window: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let window = window.max(1);

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 < window {
            out.push(first);
        } else {
            out.push(sum / window as f64);
        }
    }
    out
}

/// RSI over a trailing `period`-change window.
///
/// Gains and losses are averaged over the moves of their own sign. A window
/// with no losing move uses `RS = 100` rather than infinity. Entries before
/// the first full window are [`RSI_NEUTRAL`].
pub fn rsi_padded(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![RSI_NEUTRAL; values.len()];
    if period == 0 {
        return out;
    }

    for i in period..values.len() {
        let window = &values[i - period..=i];
        let (mut gain_sum, mut gain_n, mut loss_sum, mut loss_n) = (0.0, 0usize, 0.0, 0usize);
        for pair in window.windows(2) {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                gain_sum += change;
                gain_n += 1;
            } else if change < 0.0 {
                loss_sum -= change;
                loss_n += 1;
            }
        }

        let avg_gain = if gain_n > 0 { gain_sum / gain_n as f64 } else { 0.0 };
        let avg_loss = if loss_n > 0 { loss_sum / loss_n as f64 } else { 0.0 };

        let rs = if avg_loss == 0.0 {
            RSI_NO_LOSS_RS
        } else {
            avg_gain / avg_loss
        };
        out[i] = 100.0 - 100.0 / (1.0 + rs);
    }
    out
}

/// Bounds for every min-max normalized feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineBounds {
    pub price: FeatureBounds,
    pub volume: FeatureBounds,
    pub sentiment: FeatureBounds,
    pub sma_short: FeatureBounds,
    pub sma_long: FeatureBounds,
    pub rsi: FeatureBounds,
}

/// Converts aligned raw series into normalized observations
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    prices: Vec<f64>,
    volumes: Vec<f64>,
    sentiment: Vec<f64>,
    sma_short: Vec<f64>,
    sma_long: Vec<f64>,
    rsi: Vec<f64>,
    bounds: PipelineBounds,
}

impl FeaturePipeline {
    /// Precompute indicators and bounds. Fails on empty or misaligned input.
    pub fn new(prices: &[PriceSample], sentiment: &[SentimentSample]) -> Result<Self> {
        validate_alignment(prices, sentiment)?;

        let price_col: Vec<f64> = prices.iter().map(|s| s.price).collect();
        let volume_col: Vec<f64> = prices.iter().map(|s| s.volume).collect();
        let sentiment_col: Vec<f64> = sentiment.iter().map(|s| s.polarity).collect();

        let sma_short = sma_padded(&price_col, SMA_SHORT_WINDOW);
        let sma_long = sma_padded(&price_col, SMA_LONG_WINDOW);
        let rsi = rsi_padded(&price_col, RSI_PERIOD);

        let bounds = PipelineBounds {
            price: FeatureBounds::from_values(&price_col),
            volume: FeatureBounds::from_values(&volume_col),
            sentiment: FeatureBounds::from_values(&sentiment_col),
            sma_short: FeatureBounds::from_values(&sma_short),
            sma_long: FeatureBounds::from_values(&sma_long),
            rsi: FeatureBounds::fixed(0.0, 100.0),
        };

        Ok(Self {
            prices: price_col,
            volumes: volume_col,
            sentiment: sentiment_col,
            sma_short,
            sma_long,
            rsi,
            bounds,
        })
    }

    /// Observation at `step`; `balance_ratio` is balance / initial balance.
    ///
    /// Steps past the end of the series yield an all-zero observation.
    pub fn observe(&self, step: usize, balance_ratio: f64) -> Observation {
        if step >= self.len() {
            return [0.0; OBSERVATION_DIM];
        }

        let b = &self.bounds;
        [
            b.price.normalize(self.prices[step]) as f32,
            b.volume.normalize(self.volumes[step]) as f32,
            b.sentiment.normalize(self.sentiment[step]) as f32,
            balance_ratio as f32,
            b.sma_short.normalize(self.sma_short[step]) as f32,
            b.sma_long.normalize(self.sma_long[step]) as f32,
            b.rsi.normalize(self.rsi[step]) as f32,
        ]
    }

    /// Raw price at `step`
    pub fn price(&self, step: usize) -> Option<f64> {
        self.prices.get(step).copied()
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn rsi(&self) -> &[f64] {
        &self.rsi
    }

    pub fn sma_short(&self) -> &[f64] {
        &self.sma_short
    }

    pub fn sma_long(&self) -> &[f64] {
        &self.sma_long
    }

    pub fn bounds(&self) -> &PipelineBounds {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
