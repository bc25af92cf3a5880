//! Risk management for the decision pipeline.
//!
//! Provides Kelly-criterion position sizing with correlation and
//! portfolio-risk caps, the position ledger with its single-lock admission
//! transaction, protective stop/target levels, and the background risk
//! monitor.

mod assessment;
mod assets;
mod limits;
mod monitor;
mod position_sizer;
mod risk_manager;
mod settings;
mod stops;

pub use assessment::{assess_position, PositionRisk, RiskLevel};
pub use assets::{average_correlation, base_asset, pair_correlation};
pub use limits::LimitCheck;
pub use monitor::RiskMonitor;
pub use position_sizer::PositionSizer;
pub use risk_manager::RiskManager;
pub use settings::RiskSettings;
pub use stops::protective_levels;
