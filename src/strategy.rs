//! The ensemble strategy orchestrator.

use std::sync::Arc;
use std::time::Duration;

use ensemble_config::StrategySettings;
use ensemble_core::error::EngineError;
use ensemble_core::traits::{MacroSource, MarketDataSource, SentimentSource};
use ensemble_core::types::{
    MacroOutlook, MarketCondition, Position, PriceSeries, RiskAlert, RiskMetrics,
    SentimentScore, SignalAction, Timeframe, TradingSignal,
};
use ensemble_indicators::{annualized_volatility, classify_trend, classify_volume, FeatureSet};
use ensemble_risk::{
    assess_position, protective_levels, LimitCheck, RiskManager, RiskMonitor,
};
use ensemble_signals::{combine, macro_regime, microstructure, sentiment, technical};
use ensemble_signals::ElementarySignals;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Bars requested from the market data source per evaluation.
const DEFAULT_HISTORY_LIMIT: usize = 100;

/// The decision pipeline: providers -> indicators -> generators -> ensemble
/// -> position sizing.
///
/// [`generate_signal`](Self::generate_signal) is the sole public entry point
/// and never fails: missing market data, provider errors, and exhausted risk
/// budgets all degrade to a HOLD whose reasoning explains the degradation.
/// The strategy may be evaluated for several symbols concurrently; the risk
/// manager serializes every ledger access.
pub struct EnsembleStrategy {
    settings: StrategySettings,
    market_data: Arc<dyn MarketDataSource>,
    sentiment_source: Arc<dyn SentimentSource>,
    macro_source: Arc<dyn MacroSource>,
    risk_manager: Arc<RiskManager>,
    timeframe: Timeframe,
    history_limit: usize,
    monitor: Mutex<Option<RiskMonitor>>,
}

impl EnsembleStrategy {
    /// Build the pipeline, validating the settings.
    pub fn new(
        settings: StrategySettings,
        market_data: Arc<dyn MarketDataSource>,
        sentiment_source: Arc<dyn SentimentSource>,
        macro_source: Arc<dyn MacroSource>,
    ) -> Result<Self, EngineError> {
        settings.validate()?;
        let risk_manager = Arc::new(RiskManager::new(settings.risk)?);

        Ok(Self {
            settings,
            market_data,
            sentiment_source,
            macro_source,
            risk_manager,
            timeframe: Timeframe::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            monitor: Mutex::new(None),
        })
    }

    /// Override the market window fetched per evaluation.
    pub fn with_market_window(mut self, timeframe: Timeframe, history_limit: usize) -> Self {
        self.timeframe = timeframe;
        self.history_limit = history_limit;
        self
    }

    /// The risk manager owning the position ledger.
    pub fn risk_manager(&self) -> &Arc<RiskManager> {
        &self.risk_manager
    }

    /// Start the background risk monitor. Idempotent while running.
    pub async fn start(&self) {
        let mut monitor = self.monitor.lock().await;
        if monitor.as_ref().is_some_and(|m| m.is_running()) {
            return;
        }
        let period = Duration::from_secs(self.settings.risk.monitor_interval_secs);
        *monitor = Some(RiskMonitor::spawn(Arc::clone(&self.risk_manager), period));
    }

    /// Stop the background risk monitor, letting an in-flight sweep finish.
    pub async fn stop(&self) {
        if let Some(monitor) = self.monitor.lock().await.take() {
            monitor.stop().await;
        }
    }

    /// Analyze current market conditions for a symbol.
    ///
    /// Degrades to the neutral condition when the series or the external
    /// analyzers are unavailable.
    pub async fn analyze_market(&self, symbol: &str) -> MarketCondition {
        let series = match self.fetch_series(symbol).await {
            Some(series) => series,
            None => return MarketCondition::neutral(),
        };

        let sentiment_score = self.fetch_sentiment(symbol).await;
        let outlook = self.fetch_macro().await;
        condition_from(&series, &sentiment_score, &outlook)
    }

    /// Generate the trade decision for a symbol.
    pub async fn generate_signal(&self, symbol: &str) -> TradingSignal {
        let series = match self.fetch_series(symbol).await {
            Some(series) => series,
            None => return TradingSignal::hold("no market data available"),
        };

        let sentiment_score = self.fetch_sentiment(symbol).await;
        let outlook = self.fetch_macro().await;

        let condition = condition_from(&series, &sentiment_score, &outlook);
        debug!(
            symbol,
            trend = %condition.trend,
            volatility = condition.volatility,
            volume_profile = %condition.volume_profile,
            macro_regime = %condition.macro_regime,
            "market condition"
        );

        let features = FeatureSet::extract(&series);

        let signals = ElementarySignals {
            sentiment: sentiment::evaluate(&sentiment_score),
            technical: technical::evaluate(&features),
            microstructure: microstructure::evaluate(&series),
            macro_: macro_regime::evaluate(&outlook),
        };

        let combined = combine(
            &signals,
            &self.settings.ensemble_weights,
            self.settings.min_confidence,
        );

        let signal = self.apply_risk_sizing(symbol, &series, combined);
        info!(
            symbol,
            action = %signal.action,
            confidence = signal.confidence,
            "generated signal"
        );
        signal
    }

    /// Register an accepted directional signal as an open position.
    pub fn add_position(&self, symbol: &str, signal: &TradingSignal) -> Result<(), EngineError> {
        let (size, stop_loss, take_profit) =
            match (signal.position_size, signal.stop_loss, signal.take_profit) {
                (Some(size), Some(stop), Some(target)) => (size, stop, target),
                _ => {
                    return Err(EngineError::Internal(format!(
                        "signal for {symbol} carries no risk parameters"
                    )))
                }
            };

        let position = Position::new(
            symbol,
            size,
            self.settings.stop_loss_pct,
            stop_loss,
            take_profit,
        );
        self.risk_manager.admit(position)?;
        Ok(())
    }

    /// Close a tracked position.
    pub fn remove_position(&self, symbol: &str) -> Option<Position> {
        self.risk_manager.remove_position(symbol)
    }

    /// Check a candidate position against the risk limits.
    pub fn check_risk_limits(&self, candidate: &Position) -> LimitCheck {
        self.risk_manager.check_risk_limits(candidate)
    }

    /// Current portfolio risk metrics.
    pub fn get_risk_metrics(&self) -> RiskMetrics {
        self.risk_manager.get_risk_metrics()
    }

    /// Alerts raised by the risk monitor, oldest first.
    pub fn get_risk_alerts(&self) -> Vec<RiskAlert> {
        self.risk_manager.get_risk_alerts()
    }

    /// Operator action: drop the accumulated alerts.
    pub fn clear_risk_alerts(&self) {
        self.risk_manager.clear_risk_alerts()
    }

    /// Size a directional decision and attach its protective levels.
    fn apply_risk_sizing(
        &self,
        symbol: &str,
        series: &PriceSeries,
        combined: TradingSignal,
    ) -> TradingSignal {
        if !combined.action.is_directional() {
            return combined;
        }

        let size = self.risk_manager.size_position(symbol, combined.confidence);
        if size <= 0.0 {
            warn!(symbol, "no admissible size under current risk limits");
            return TradingSignal::new(
                SignalAction::Hold,
                combined.confidence.min(0.5),
                format!(
                    "{} | risk: no admissible size under current limits",
                    combined.reasoning
                ),
            );
        }

        let price = match series.last() {
            Some(bar) => bar.close,
            None => return TradingSignal::hold("no market data available"),
        };

        // Directional action always yields levels here
        let Some((stop_loss, take_profit)) = protective_levels(
            combined.action,
            price,
            self.settings.stop_loss_pct,
            self.settings.take_profit_pct,
        ) else {
            return combined;
        };

        let prospective = Position::new(
            symbol,
            size,
            self.settings.stop_loss_pct,
            stop_loss,
            take_profit,
        );
        let assessment = assess_position(&prospective, price);
        info!(
            symbol,
            size,
            risk_level = %assessment.risk_level,
            risk_reward = assessment.risk_reward_ratio,
            "sized directional signal"
        );

        combined.with_risk_params(stop_loss, take_profit, size)
    }

    async fn fetch_series(&self, symbol: &str) -> Option<PriceSeries> {
        match self
            .market_data
            .get_price_series(symbol, self.timeframe, self.history_limit)
            .await
        {
            Ok(Some(series)) if !series.is_empty() => Some(series),
            Ok(_) => {
                warn!(symbol, "market data source returned no bars");
                None
            }
            Err(err) => {
                warn!(symbol, %err, "market data source failed");
                None
            }
        }
    }

    async fn fetch_sentiment(&self, symbol: &str) -> SentimentScore {
        match self.sentiment_source.get_sentiment(symbol).await {
            Ok(score) => score,
            Err(err) => {
                warn!(symbol, %err, "sentiment source failed, using neutral");
                SentimentScore::neutral()
            }
        }
    }

    async fn fetch_macro(&self) -> MacroOutlook {
        match self.macro_source.get_macro().await {
            Ok(outlook) => outlook,
            Err(err) => {
                warn!(%err, "macro source failed, using neutral");
                MacroOutlook::neutral()
            }
        }
    }
}

/// Derive the market-condition snapshot for one evaluation.
fn condition_from(
    series: &PriceSeries,
    sentiment: &SentimentScore,
    outlook: &MacroOutlook,
) -> MarketCondition {
    let closes = series.closes();
    MarketCondition {
        trend: classify_trend(&closes),
        volatility: annualized_volatility(&closes).unwrap_or(0.02),
        volume_profile: classify_volume(&series.volumes()),
        sentiment: sentiment.score,
        macro_regime: outlook.regime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ensemble_core::error::DataError;
    use ensemble_core::types::{Bar, MacroRegime, Trend};

    struct StaticMarketData {
        bars: Vec<Bar>,
    }

    impl StaticMarketData {
        fn from_closes(closes: &[f64], volume: f64) -> Self {
            let bars = closes
                .iter()
                .enumerate()
                .map(|(i, &c)| Bar::new(i as i64 + 1, c, c + 1.0, c - 1.0, c, volume))
                .collect();
            Self { bars }
        }
    }

    #[async_trait]
    impl MarketDataSource for StaticMarketData {
        async fn get_price_series(
            &self,
            symbol: &str,
            timeframe: Timeframe,
            limit: usize,
        ) -> Result<Option<PriceSeries>, DataError> {
            if self.bars.is_empty() {
                return Ok(None);
            }
            let mut series =
                PriceSeries::with_capacity(symbol.to_string(), timeframe, limit);
            series.extend(self.bars.iter().copied())?;
            Ok(Some(series))
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    struct FailingMarketData;

    #[async_trait]
    impl MarketDataSource for FailingMarketData {
        async fn get_price_series(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
            _limit: usize,
        ) -> Result<Option<PriceSeries>, DataError> {
            Err(DataError::SourceUnavailable("exchange down".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct StaticSentiment(SentimentScore);

    #[async_trait]
    impl SentimentSource for StaticSentiment {
        async fn get_sentiment(&self, _symbol: &str) -> Result<SentimentScore, DataError> {
            Ok(self.0)
        }
    }

    struct FailingSentiment;

    #[async_trait]
    impl SentimentSource for FailingSentiment {
        async fn get_sentiment(&self, _symbol: &str) -> Result<SentimentScore, DataError> {
            Err(DataError::SourceUnavailable("analyzer down".to_string()))
        }
    }

    struct StaticMacro(MacroOutlook);

    #[async_trait]
    impl MacroSource for StaticMacro {
        async fn get_macro(&self) -> Result<MacroOutlook, DataError> {
            Ok(self.0)
        }
    }

    fn strategy_with(
        market_data: Arc<dyn MarketDataSource>,
        sentiment: SentimentScore,
        outlook: MacroOutlook,
    ) -> EnsembleStrategy {
        EnsembleStrategy::new(
            StrategySettings::default(),
            market_data,
            Arc::new(StaticSentiment(sentiment)),
            Arc::new(StaticMacro(outlook)),
        )
        .unwrap()
    }

    fn bullish_inputs() -> (SentimentScore, MacroOutlook) {
        (
            SentimentScore {
                score: 0.9,
                confidence: 0.9,
            },
            MacroOutlook {
                regime: MacroRegime::Bull,
                confidence: 0.9,
            },
        )
    }

    #[tokio::test]
    async fn test_no_market_data_degrades_to_hold() {
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(
            Arc::new(StaticMarketData { bars: vec![] }),
            sentiment,
            outlook,
        );

        let signal = strategy.generate_signal("BTC/USDT").await;
        assert_eq!(signal.action, SignalAction::Hold);
        assert_eq!(signal.reasoning, "no market data available");
        assert!((signal.confidence - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_failing_market_data_degrades_to_hold() {
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(Arc::new(FailingMarketData), sentiment, outlook);

        let signal = strategy.generate_signal("BTC/USDT").await;
        assert_eq!(signal.action, SignalAction::Hold);
        assert_eq!(signal.reasoning, "no market data available");
    }

    #[tokio::test]
    async fn test_failing_sentiment_still_produces_signal() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let strategy = EnsembleStrategy::new(
            StrategySettings::default(),
            Arc::new(StaticMarketData::from_closes(&closes, 1000.0)),
            Arc::new(FailingSentiment),
            Arc::new(StaticMacro(MacroOutlook::neutral())),
        )
        .unwrap();

        // Must not error; neutral sentiment cannot carry a direction alone
        let signal = strategy.generate_signal("BTC/USDT").await;
        assert_eq!(signal.action, SignalAction::Hold);
        assert!(signal.confidence <= 0.5 + 1e-12);
    }

    #[tokio::test]
    async fn test_aligned_sources_produce_sized_buy() {
        // A long decline leaves RSI oversold and price at the lower band;
        // with bullish sentiment and macro the ensemble clears the bar.
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(
            Arc::new(StaticMarketData::from_closes(&closes, 1000.0)),
            sentiment,
            outlook,
        );

        let signal = strategy.generate_signal("BTC/USDT").await;
        assert_eq!(signal.action, SignalAction::Buy);

        // Default risk settings bind the size at 2x max_position_risk
        let size = signal.position_size.unwrap();
        assert!((size - 0.01).abs() < 1e-12);

        let close = *closes.last().unwrap();
        assert!((signal.stop_loss.unwrap() - close * 0.95).abs() < 1e-9);
        assert!((signal.take_profit.unwrap() - close * 1.15).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_flat_market_neutral_inputs_hold() {
        let strategy = strategy_with(
            Arc::new(StaticMarketData::from_closes(&[100.0; 60], 1000.0)),
            SentimentScore::neutral(),
            MacroOutlook::neutral(),
        );

        let signal = strategy.generate_signal("BTC/USDT").await;
        assert_eq!(signal.action, SignalAction::Hold);
        assert!(signal.position_size.is_none());
    }

    #[tokio::test]
    async fn test_exhausted_budget_demotes_to_hold() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(
            Arc::new(StaticMarketData::from_closes(&closes, 1000.0)),
            sentiment,
            outlook,
        );

        // Fill the portfolio risk budget with uncorrelated positions
        for symbol in ["DOGE/USDT", "XRP/USDT", "SHIB/USDT", "PEPE/USDT"] {
            strategy
                .risk_manager()
                .admit(Position::new(symbol, 0.1, 0.05, 95.0, 115.0))
                .unwrap();
        }

        let signal = strategy.generate_signal("BTC/USDT").await;
        assert_eq!(signal.action, SignalAction::Hold);
        assert!(signal.confidence <= 0.5);
        assert!(signal.reasoning.contains("no admissible size"));
    }

    #[tokio::test]
    async fn test_add_and_remove_position_flow() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(
            Arc::new(StaticMarketData::from_closes(&closes, 1000.0)),
            sentiment,
            outlook,
        );

        let signal = strategy.generate_signal("BTC/USDT").await;
        strategy.add_position("BTC/USDT", &signal).unwrap();

        let metrics = strategy.get_risk_metrics();
        assert!(metrics.volatility > 0.0);

        let removed = strategy.remove_position("BTC/USDT").unwrap();
        assert_eq!(removed.symbol, "BTC/USDT");
        assert!(strategy.risk_manager().positions().is_empty());
    }

    #[tokio::test]
    async fn test_add_position_requires_risk_params() {
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(
            Arc::new(StaticMarketData { bars: vec![] }),
            sentiment,
            outlook,
        );

        let hold = TradingSignal::hold("nothing to do");
        assert!(strategy.add_position("BTC/USDT", &hold).is_err());
    }

    #[tokio::test]
    async fn test_check_risk_limits_passthrough() {
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(
            Arc::new(StaticMarketData { bars: vec![] }),
            sentiment,
            outlook,
        );

        let oversized = Position::new("BTC/USDT", 0.5, 0.005, 95.0, 115.0);
        assert!(!strategy.check_risk_limits(&oversized).is_allowed());

        let fine = Position::new("BTC/USDT", 0.05, 0.005, 95.0, 115.0);
        assert!(strategy.check_risk_limits(&fine).is_allowed());
    }

    #[tokio::test]
    async fn test_analyze_market_conditions() {
        let mut closes = vec![100.0; 40];
        closes.extend((0..20).map(|i| 100.0 + i as f64));
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(
            Arc::new(StaticMarketData::from_closes(&closes, 1000.0)),
            sentiment,
            outlook,
        )
        .with_market_window(Timeframe::Hour4, 80);

        let condition = strategy.analyze_market("BTC/USDT").await;
        assert_eq!(condition.trend, Trend::Bullish);
        assert!(condition.volatility > 0.0);
        assert!((condition.sentiment - 0.9).abs() < 1e-12);
        assert_eq!(condition.macro_regime, MacroRegime::Bull);
    }

    #[tokio::test]
    async fn test_analyze_market_without_data_is_neutral() {
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(Arc::new(FailingMarketData), sentiment, outlook);

        let condition = strategy.analyze_market("BTC/USDT").await;
        assert_eq!(condition, MarketCondition::neutral());
    }

    #[tokio::test]
    async fn test_alert_passthrough() {
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(
            Arc::new(StaticMarketData { bars: vec![] }),
            sentiment,
            outlook,
        );

        // Admissible position that still breaches the per-position budget
        strategy
            .risk_manager()
            .admit(Position::new("BTC/USDT", 0.1, 0.1, 95.0, 115.0))
            .unwrap();
        strategy.risk_manager().run_risk_cycle();

        assert!(!strategy.get_risk_alerts().is_empty());
        strategy.clear_risk_alerts();
        assert!(strategy.get_risk_alerts().is_empty());
    }

    #[tokio::test]
    async fn test_monitor_lifecycle() {
        let (sentiment, outlook) = bullish_inputs();
        let strategy = strategy_with(
            Arc::new(StaticMarketData { bars: vec![] }),
            sentiment,
            outlook,
        );

        strategy.start().await;
        strategy.start().await; // idempotent
        strategy.stop().await;
        strategy.stop().await; // idempotent
    }
}
