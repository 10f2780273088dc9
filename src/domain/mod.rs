//! Domain layer - Core business logic
//!
//! Contains value objects, entities, path rules and domain errors.
//! This layer has no dependencies on external systems.

pub mod audit;
pub mod config;
pub mod error;
pub mod paths;
pub mod recognition;
pub mod timing;

// Re-export common types
pub use audit::{AuditReport, AuditSession, AuditState, Command, FileOutcome, UnansweredPolicy, WorkQueue};
pub use config::AppConfig;
pub use error::*;
pub use recognition::{Recognition, RecognizerKind, Vocabulary};
pub use timing::Duration;
