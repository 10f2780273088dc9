//! Audit session domain: queue, commands, states and outcomes

mod command;
mod outcome;
mod policy;
mod queue;
mod state;

pub use command::Command;
pub use outcome::{AuditReport, FileOutcome};
pub use policy::UnansweredPolicy;
pub use queue::WorkQueue;
pub use state::{AuditSession, AuditState, InvalidStateTransition, PlaybackState};
