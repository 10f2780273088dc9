//! Application layer - Use cases and port interfaces
//!
//! Contains the audit loop and the trait definitions for playback,
//! speech recognition, scanning and configuration storage.

pub mod audit;
pub mod dispatch;
pub mod playback;
pub mod ports;

// Re-export use cases
pub use audit::{AuditCallbacks, AuditConfig, AuditError, AuditLoop, AuditRoots, SetupError};
pub use dispatch::{CommandDispatcher, DispatchError, Dispatched};
pub use playback::{PlaybackController, PlaybackSession};
