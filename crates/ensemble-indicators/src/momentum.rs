//! Momentum indicators.

use ensemble_core::traits::Indicator;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes to evaluate
/// overbought or oversold conditions. Uses Wilder's smoothing.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// The conventional period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Wilder's smoothing: avg = (prev_avg * (period-1) + value) / period.
    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }

        let mut result = Vec::with_capacity(values.len() - period + 1);
        let period_f64 = period as f64;

        let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
        result.push(avg);

        for &value in &values[period..] {
            avg = (avg * (period_f64 - 1.0) + value) / period_f64;
            result.push(avg);
        }

        result
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let mut gains = Vec::with_capacity(data.len() - 1);
        let mut losses = Vec::with_capacity(data.len() - 1);

        for i in 1..data.len() {
            let change = data[i] - data[i - 1];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        let avg_gains = Self::wilder_smooth(&gains, self.period);
        let avg_losses = Self::wilder_smooth(&losses, self.period);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| {
                if loss == 0.0 {
                    // A flat window has no gains either; read it as neutral
                    if gain == 0.0 {
                        50.0
                    } else {
                        100.0
                    }
                } else {
                    100.0 - (100.0 / (1.0 + gain / loss))
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) line.
///
/// The difference between a fast and a slow EMA. Positive values indicate
/// upward momentum, negative values downward momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
}

impl Macd {
    /// Create a new MACD with default periods (12, 26).
    pub fn new() -> Self {
        Self::with_periods(12, 26)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize) -> Self {
        assert!(fast > 0 && slow > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
        }
    }

    fn calculate_ema(data: &[f64], period: usize) -> Vec<f64> {
        if data.len() < period {
            return vec![];
        }

        let multiplier = 2.0 / (period as f64 + 1.0);
        let mut result = Vec::with_capacity(data.len() - period + 1);

        let sma: f64 = data[..period].iter().sum::<f64>() / period as f64;
        result.push(sma);

        let mut ema = sma;
        for &price in &data[period..] {
            ema = price * multiplier + ema * (1.0 - multiplier);
            result.push(ema);
        }

        result
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Macd {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.slow_period {
            return vec![];
        }

        let fast_ema = Self::calculate_ema(data, self.fast_period);
        let slow_ema = Self::calculate_ema(data, self.slow_period);

        // The fast EMA has more values; align to the slow one
        let offset = self.slow_period - self.fast_period;
        fast_ema[offset..]
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect()
    }

    fn period(&self) -> usize {
        self.slow_period
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
