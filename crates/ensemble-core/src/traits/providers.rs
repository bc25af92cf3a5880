//! Traits for the external collaborators feeding the pipeline.
//!
//! Market data retrieval, sentiment inference, and macro analysis live
//! outside this core; the pipeline consumes them through these interfaces
//! and degrades to neutral inputs when they fail.

use async_trait::async_trait;

use crate::error::DataError;
use crate::types::{MacroOutlook, PriceSeries, SentimentScore, Timeframe};

/// Source of historical OHLCV bars.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the most recent bars for a symbol.
    ///
    /// Returns `Ok(None)` when the source has no data for the symbol; the
    /// caller treats both `None` and `Err` as "no market data available".
    async fn get_price_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Option<PriceSeries>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

/// Source of natural-language sentiment scores.
#[async_trait]
pub trait SentimentSource: Send + Sync {
    /// Fetch the current sentiment for a symbol.
    async fn get_sentiment(&self, symbol: &str) -> Result<SentimentScore, DataError>;
}

/// Source of macro-economic regime analysis.
#[async_trait]
pub trait MacroSource: Send + Sync {
    /// Fetch the current macro outlook.
    async fn get_macro(&self) -> Result<MacroOutlook, DataError>;
}
