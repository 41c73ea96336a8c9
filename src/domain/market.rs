use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{BitHunterError, Result};

/// One historical tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: f64,
    pub volume: f64,
}

impl PriceSample {
    pub fn new(price: f64, volume: f64) -> Self {
        Self { price, volume }
    }
}

/// One news-sentiment reading, polarity in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSample {
    pub polarity: f64,
}

impl SentimentSample {
    pub fn new(polarity: f64) -> Self {
        Self { polarity }
    }
}

/// Flat row as found in exported JSON files: `{"price":..,"volume":..,"sentiment":..}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketRow {
    pub price: f64,
    pub volume: f64,
    #[serde(default)]
    pub sentiment: f64,
}

/// Check that a price series and a sentiment series can drive one environment.
pub fn validate_alignment(prices: &[PriceSample], sentiment: &[SentimentSample]) -> Result<()> {
    if prices.is_empty() || sentiment.is_empty() {
        return Err(BitHunterError::validation(
            "price and sentiment series cannot be empty",
        ));
    }
    if prices.len() != sentiment.len() {
        return Err(BitHunterError::validation(format!(
            "price and sentiment series must have the same length ({} != {})",
            prices.len(),
            sentiment.len()
        )));
    }
    if let Some(idx) = prices
        .iter()
        .position(|s| !s.price.is_finite() || !s.volume.is_finite())
    {
        return Err(BitHunterError::validation(format!(
            "price sample {} is not finite",
            idx
        )));
    }
    if let Some(idx) = prices.iter().position(|s| s.price <= 0.0) {
        return Err(BitHunterError::validation(format!(
            "price sample {} must be positive",
            idx
        )));
    }
    if let Some(idx) = sentiment.iter().position(|s| !s.polarity.is_finite()) {
        return Err(BitHunterError::validation(format!(
            "sentiment sample {} is not finite",
            idx
        )));
    }
    Ok(())
}

/// Time-ordered, index-aligned price/volume and sentiment history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSeries {
    prices: Vec<PriceSample>,
    sentiment: Vec<SentimentSample>,
}

impl MarketSeries {
    /// Create a series, failing on empty or misaligned input
    pub fn new(prices: Vec<PriceSample>, sentiment: Vec<SentimentSample>) -> Result<Self> {
        validate_alignment(&prices, &sentiment)?;
        Ok(Self { prices, sentiment })
    }

    /// Build from raw `[price, volume, ...]` rows and a parallel polarity column.
    ///
    /// Rows with fewer than two columns are rejected.
    pub fn from_columns(price_rows: &[Vec<f64>], polarity: &[f64]) -> Result<Self> {
        let mut prices = Vec::with_capacity(price_rows.len());
        for (idx, row) in price_rows.iter().enumerate() {
            match row.as_slice() {
                [price, volume, ..] => prices.push(PriceSample::new(*price, *volume)),
                _ => {
                    return Err(BitHunterError::validation(format!(
                        "price row {} must have at least price and volume columns",
                        idx
                    )))
                }
            }
        }
        let sentiment = polarity.iter().copied().map(SentimentSample::new).collect();
        Self::new(prices, sentiment)
    }

    /// Build from flat JSON-style rows
    pub fn from_rows(rows: &[MarketRow]) -> Result<Self> {
        let prices = rows
            .iter()
            .map(|r| PriceSample::new(r.price, r.volume))
            .collect();
        let sentiment = rows
            .iter()
            .map(|r| SentimentSample::new(r.sentiment))
            .collect();
        Self::new(prices, sentiment)
    }

    /// Parse a JSON array of rows
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<MarketRow> = serde_json::from_str(json)?;
        Self::from_rows(&rows)
    }

    pub fn to_rows(&self) -> Vec<MarketRow> {
        self.prices
            .iter()
            .zip(&self.sentiment)
            .map(|(p, s)| MarketRow {
                price: p.price,
                volume: p.volume,
                sentiment: s.polarity,
            })
            .collect()
    }

    pub fn prices(&self) -> &[PriceSample] {
        &self.prices
    }

    pub fn sentiment(&self) -> &[SentimentSample] {
        &self.sentiment
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Generate a synthetic random-walk series for demos and tests
pub fn generate_sample_series(len: usize, volatility: f64, seed: Option<u64>) -> MarketSeries {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let len = len.max(1);
    let volatility = volatility.abs();

    let mut prices = Vec::with_capacity(len);
    let mut sentiment = Vec::with_capacity(len);

    let mut price = 100.0_f64;
    let mut polarity = 0.0_f64;

    for _ in 0..len {
        let change = if volatility > 0.0 {
            rng.gen_range(-volatility..volatility)
        } else {
            0.0
        };
        price = (price * (1.0 + change)).max(0.01);
        let volume = 1_000.0 * (1.0 + rng.gen_range(-0.5..0.5));

        // Sentiment drifts slowly and loosely follows the price move
        polarity = (0.8 * polarity + 0.2 * rng.gen_range(-1.0..1.0) + change * 5.0).clamp(-1.0, 1.0);

        prices.push(PriceSample::new(price, volume));
        sentiment.push(SentimentSample::new(polarity));
    }

    MarketSeries { prices, sentiment }
}
