//! Return-series statistics: Sharpe ratio, historical VaR and drawdown.

/// Trading periods per year used to annualize the Sharpe ratio
pub const TRADING_PERIODS_PER_YEAR: f64 = 252.0;

/// Simple period returns `(v[t] - v[t-1]) / v[t-1]`.
///
/// A period starting from a zero value contributes a zero return.
pub fn period_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Annualized Sharpe ratio (zero risk-free rate); 0 when returns are flat or empty
pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
    let std = std_dev(returns);
    if returns.is_empty() || std == 0.0 {
        return 0.0;
    }
    mean(returns) / std * periods_per_year.sqrt()
}

/// Percentile with linear interpolation between closest ranks (`pct` in [0, 100])
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Historical VaR: the `(1 - confidence)` percentile of returns.
///
/// Returns 0 under the same degenerate conditions as [`sharpe_ratio`].
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() || std_dev(returns) == 0.0 {
        return 0.0;
    }
    percentile(returns, (1.0 - confidence) * 100.0)
}

/// Running peak / max drawdown fraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownTracker {
    peak: f64,
    max_drawdown: f64,
}

impl DrawdownTracker {
    pub fn new(start: f64) -> Self {
        Self {
            peak: start,
            max_drawdown: 0.0,
        }
    }

    /// Record a value; returns the current drawdown fraction
    pub fn update(&mut self, value: f64) -> f64 {
        if value > self.peak {
            self.peak = value;
        }
        let drawdown = if self.peak > 0.0 {
            (self.peak - value) / self.peak
        } else {
            0.0
        };
        self.max_drawdown = self.max_drawdown.max(drawdown);
        drawdown
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_returns() {
        let returns = period_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);
        assert!(period_returns(&[100.0]).is_empty());
        assert_eq!(period_returns(&[0.0, 5.0]), vec![0.0]);
    }

    #[test]
    fn test_sharpe_population_std() {
        let returns = [0.01, 0.03];
        // mean 0.02, population std 0.01
        let expected = 2.0 * 252.0_f64.sqrt();
        assert!((sharpe_ratio(&returns, 252.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sharpe_degenerate() {
        assert_eq!(sharpe_ratio(&[], 252.0), 0.0);
        assert_eq!(sharpe_ratio(&[0.01, 0.01, 0.01], 252.0), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 100.0), 5.0);
        assert_eq!(percentile(&values, 50.0), 3.0);
        // rank 0.2 between 1 and 2
        assert!((percentile(&values, 5.0) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_var_is_lower_tail() {
        let returns = [-0.05, 0.01, 0.02, 0.03, 0.04];
        let var = value_at_risk(&returns, 0.95);
        assert!(var < 0.0);
        assert!(var >= -0.05);
        assert_eq!(value_at_risk(&[], 0.95), 0.0);
    }

    #[test]
    fn test_drawdown_tracker() {
        let mut tracker = DrawdownTracker::new(100.0);
        tracker.update(120.0);
        tracker.update(90.0);
        tracker.update(130.0);

        assert_eq!(tracker.peak(), 130.0);
        assert!((tracker.max_drawdown() - 0.25).abs() < 1e-12);
    }
}
