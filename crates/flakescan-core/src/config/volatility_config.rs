//! Volatile-field declarations.
//!
//! Fields listed here are excluded from idempotency equality for their
//! operation kind — typically generated identifiers on CREATE. Volatility is
//! explicit configuration, never inferred: auto-detection would risk masking
//! real violations.

use serde::{Deserialize, Serialize};

use crate::model::OperationKind;

/// Per-operation-kind sets of field names excluded from equality.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VolatilityConfig {
    pub create: Vec<String>,
    pub read: Vec<String>,
    pub update: Vec<String>,
    pub delete: Vec<String>,
}

impl VolatilityConfig {
    /// Volatile field names for `kind`. Non-CRUD kinds have none.
    pub fn for_operation(&self, kind: OperationKind) -> &[String] {
        match kind {
            OperationKind::Create => &self.create,
            OperationKind::Read => &self.read,
            OperationKind::Update => &self.update,
            OperationKind::Delete => &self.delete,
            OperationKind::None => &[],
        }
    }
}
