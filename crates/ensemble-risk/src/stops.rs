//! Protective stop-loss and take-profit levels.

use ensemble_core::types::SignalAction;

/// Stop and target levels around the entry price.
///
/// Long entries stop below and target above; shorts mirror. Returns `None`
/// for HOLD, which never opens a position.
pub fn protective_levels(
    action: SignalAction,
    price: f64,
    stop_loss_pct: f64,
    take_profit_pct: f64,
) -> Option<(f64, f64)> {
    match action {
        SignalAction::Buy => Some((
            price * (1.0 - stop_loss_pct),
            price * (1.0 + take_profit_pct),
        )),
        SignalAction::Sell => Some((
            price * (1.0 + stop_loss_pct),
            price * (1.0 - take_profit_pct),
        )),
        SignalAction::Hold => None,
    }
}
