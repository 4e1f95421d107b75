//! Stable error codes for external consumers (report renderers, CLI shims).

/// Machine-readable code attached to every subsystem error.
pub trait FlakescanErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const CONFIG_ERROR: &str = "FSCAN_CONFIG";
pub const STORE_ERROR: &str = "FSCAN_STORE";
pub const ANALYSIS_ERROR: &str = "FSCAN_ANALYSIS";
pub const VALIDATION_ERROR: &str = "FSCAN_VALIDATION";
