//! Volatility indicators.

use ensemble_core::traits::MultiOutputIndicator;
use serde::{Deserialize, Serialize};

/// Trading days per year used for annualization.
const TRADING_DAYS: f64 = 252.0;

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
    /// %B ((price - lower) / (upper - lower)); 0.5 when the bands collapse
    pub percent_b: f64,
}

/// Bollinger Bands.
///
/// A middle band (SMA) with upper and lower bands at a specified number of
/// standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        if data.len() < self.period {
            return vec![];
        }

        let period_f64 = self.period as f64;
        let mut result = Vec::with_capacity(data.len() - self.period + 1);

        for (i, window) in data.windows(self.period).enumerate() {
            let mean: f64 = window.iter().sum::<f64>() / period_f64;
            let variance: f64 =
                window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
            let std_dev = variance.sqrt();

            let upper = mean + self.std_dev_multiplier * std_dev;
            let lower = mean - self.std_dev_multiplier * std_dev;

            let price = data[self.period - 1 + i];
            let percent_b = if upper > lower {
                (price - lower) / (upper - lower)
            } else {
                0.5 // Zero-variance window: bands collapse onto the mean
            };

            result.push(BollingerOutput {
                upper,
                middle: mean,
                lower,
                percent_b,
            });
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

/// Annualized realized volatility from a close-price series.
///
/// Sample standard deviation of simple returns scaled by √252. Returns
/// `None` when fewer than two returns exist.
pub fn annualized_volatility(closes: &[f64]) -> Option<f64> {
    if closes.len() < 3 {
        return None;
    }

    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some(variance.sqrt() * TRADING_DAYS.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_bands() {
        let bb = BollingerBands::new();
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0)
            .collect();

        let result = bb.calculate(&data);
        assert!(!result.is_empty());

        for output in &result {
            assert!(output.upper > output.middle);
            assert!(output.middle > output.lower);
            assert!(output.percent_b.is_finite());
        }
    }

    #[test]
    fn test_bollinger_flat_series_midpoint() {
        let bb = BollingerBands::with_params(5, 2.0);
        let data = vec![100.0; 5];

        let result = bb.calculate(&data);
        assert_eq!(result.len(), 1);

        // Zero variance collapses the bands; %B falls back to the midpoint
        assert!((result[0].percent_b - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bollinger_insufficient_data() {
        let bb = BollingerBands::new();
        assert!(bb.calculate(&[100.0, 101.0]).is_empty());
    }

    #[test]
    fn test_volatility_positive_for_moving_prices() {
        let closes: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 3.0)
            .collect();

        let vol = annualized_volatility(&closes).unwrap();
        assert!(vol > 0.0);
    }

    #[test]
    fn test_volatility_zero_for_flat_prices() {
        let closes = vec![100.0; 10];
        let vol = annualized_volatility(&closes).unwrap();
        assert!(vol.abs() < 1e-12);
    }

    #[test]
    fn test_volatility_insufficient_data() {
        assert!(annualized_volatility(&[100.0, 101.0]).is_none());
        assert!(annualized_volatility(&[]).is_none());
    }
}
