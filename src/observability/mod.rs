//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (tx hashes, addresses, roles)
//!
//! Consumers:
//!     → logging.rs (fmt subscriber on stderr, filtered by level)
//! ```
//!
//! # Design Decisions
//! - Secrets never appear in events
//! - The final summary goes to stdout; progress goes through tracing

pub mod logging;
