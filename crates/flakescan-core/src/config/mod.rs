//! Configuration layer.

pub mod analysis_config;
pub mod flakescan_config;
pub mod volatility_config;

pub use analysis_config::AnalysisConfig;
pub use flakescan_config::{CliOverrides, FlakescanConfig};
pub use volatility_config::VolatilityConfig;
