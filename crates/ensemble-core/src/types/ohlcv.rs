//! OHLCV (Open, High, Low, Close, Volume) data types.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::DataError;

use super::Timeframe;

/// Compact OHLCV bar. Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Rolling window of bars for one symbol, append-only within a session.
///
/// Timestamps are strictly increasing; pushing a bar that does not advance
/// the clock is rejected. When a capacity is set, the oldest bar is dropped
/// as new bars arrive.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: VecDeque<Bar>,
    /// Maximum capacity (0 = unlimited)
    capacity: usize,
}

impl PriceSeries {
    /// Create a new empty series.
    pub fn new(symbol: String, timeframe: Timeframe) -> Self {
        Self {
            symbol,
            timeframe,
            bars: VecDeque::new(),
            capacity: 0,
        }
    }

    /// Create a series with a maximum capacity. When the capacity is
    /// reached, the oldest bars are removed.
    pub fn with_capacity(symbol: String, timeframe: Timeframe, capacity: usize) -> Self {
        Self {
            symbol,
            timeframe,
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a bar, removing the oldest if at capacity.
    ///
    /// Rejects bars whose timestamp does not advance past the latest bar.
    pub fn push(&mut self, bar: Bar) -> Result<(), DataError> {
        if let Some(last) = self.bars.back() {
            if bar.timestamp <= last.timestamp {
                return Err(DataError::OutOfOrderBar {
                    symbol: self.symbol.clone(),
                    timestamp: bar.timestamp,
                    last: last.timestamp,
                });
            }
        }
        if self.capacity > 0 && self.bars.len() >= self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
        Ok(())
    }

    /// Append multiple bars, stopping at the first out-of-order one.
    pub fn extend(&mut self, bars: impl IntoIterator<Item = Bar>) -> Result<(), DataError> {
        for bar in bars {
            self.push(bar)?;
        }
        Ok(())
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Get the last N bars (fewer if the series is shorter).
    pub fn last_n(&self, n: usize) -> Vec<&Bar> {
        let start = self.bars.len().saturating_sub(n);
        self.bars.iter().skip(start).collect()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64, volume: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close, volume)
    }

    #[test]
    fn test_push_ordered() {
        let mut series = PriceSeries::new("BTC/USDT".to_string(), Timeframe::Hour1);
        assert!(series.push(bar(1, 100.0, 10.0)).is_ok());
        assert!(series.push(bar(2, 101.0, 11.0)).is_ok());
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.0, 101.0]);
    }

    #[test]
    fn test_push_out_of_order_rejected() {
        let mut series = PriceSeries::new("BTC/USDT".to_string(), Timeframe::Hour1);
        series.push(bar(5, 100.0, 10.0)).unwrap();

        let err = series.push(bar(5, 101.0, 10.0)).unwrap_err();
        assert!(matches!(err, DataError::OutOfOrderBar { .. }));

        let err = series.push(bar(3, 101.0, 10.0)).unwrap_err();
        assert!(matches!(err, DataError::OutOfOrderBar { .. }));
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_capacity_rolls_window() {
        let mut series =
            PriceSeries::with_capacity("ETH/USDT".to_string(), Timeframe::Hour1, 3);
        for i in 1..=4 {
            series.push(bar(i, 100.0 + i as f64, 10.0)).unwrap();
        }
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(0).unwrap().timestamp, 2);
    }

    #[test]
    fn test_last_n() {
        let mut series = PriceSeries::new("BTC/USDT".to_string(), Timeframe::Hour1);
        for i in 1..=5 {
            series.push(bar(i, 100.0, i as f64)).unwrap();
        }

        let last = series.last_n(3);
        assert_eq!(last.len(), 3);
        assert_eq!(last[0].timestamp, 3);

        // Asking for more than available returns everything
        assert_eq!(series.last_n(10).len(), 5);
    }
}
