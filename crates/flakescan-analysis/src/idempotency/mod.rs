//! Idempotency validation for CRUD-tagged operations.

pub mod rules;
pub mod validator;

pub use validator::IdempotencyValidator;
