//! Asset-level policy heuristics: pairwise correlation tiers and the
//! volatility table used for portfolio metrics.
//!
//! The three-tier correlation model (same asset / both majors / other) is a
//! policy constant standing in for a statistically estimated correlation
//! matrix. TODO: replace with rolling correlations estimated from the price
//! series once the data layer exposes aligned return histories.

/// Base assets treated as highly correlated with each other.
const MAJOR_ASSETS: [&str; 7] = ["BTC", "ETH", "BNB", "ADA", "SOL", "DOT", "LINK"];

/// Correlation between two identical assets.
const SAME_ASSET_CORRELATION: f64 = 1.0;
/// Correlation between two distinct major assets.
const MAJOR_PAIR_CORRELATION: f64 = 0.8;
/// Correlation between everything else.
const DEFAULT_CORRELATION: f64 = 0.3;

/// Per-asset annualized volatility assumptions for portfolio metrics.
const ASSET_VOLATILITY: [(&str, f64); 5] = [
    ("BTC/USDT", 0.04),
    ("ETH/USDT", 0.05),
    ("BNB/USDT", 0.06),
    ("ADA/USDT", 0.07),
    ("SOL/USDT", 0.08),
];

/// Fallback volatility for assets not in the table.
const DEFAULT_VOLATILITY: f64 = 0.05;

/// Extract the base asset from a pair symbol ("BTC/USDT" -> "BTC").
pub fn base_asset(symbol: &str) -> &str {
    symbol.split('/').next().unwrap_or(symbol)
}

fn is_major(base: &str) -> bool {
    MAJOR_ASSETS.contains(&base)
}

/// Pairwise correlation between two symbols.
pub fn pair_correlation(a: &str, b: &str) -> f64 {
    let (base_a, base_b) = (base_asset(a), base_asset(b));
    if base_a == base_b {
        SAME_ASSET_CORRELATION
    } else if is_major(base_a) && is_major(base_b) {
        MAJOR_PAIR_CORRELATION
    } else {
        DEFAULT_CORRELATION
    }
}

/// Average pairwise correlation across a set of symbols.
///
/// Zero for fewer than two symbols.
pub fn average_correlation<S: AsRef<str>>(symbols: &[S]) -> f64 {
    if symbols.len() < 2 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut pairs = 0usize;
    for i in 0..symbols.len() {
        for j in (i + 1)..symbols.len() {
            sum += pair_correlation(symbols[i].as_ref(), symbols[j].as_ref());
            pairs += 1;
        }
    }

    sum / pairs as f64
}

/// Assumed annualized volatility for one symbol.
pub fn asset_volatility(symbol: &str) -> f64 {
    ASSET_VOLATILITY
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, v)| *v)
        .unwrap_or(DEFAULT_VOLATILITY)
}
