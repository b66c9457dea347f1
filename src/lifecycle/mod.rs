//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load .env → Load config → Validate → Init logging → Resolve environment
//!
//! Confirmation (confirmation.rs):
//!     Print plan → Wait for operator → Confirmed token → mutations may start
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No mid-run cancellation; a submitted transaction stays submitted

pub mod confirmation;

pub use confirmation::{ConfirmationError, ConfirmationGate, Confirmed};
