//! Core types and traits for the decision pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries)
//! - Trading signals and market condition snapshots
//! - Position, risk metric, and risk alert types
//! - Traits for indicators and external data providers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use traits::*;
pub use types::*;
