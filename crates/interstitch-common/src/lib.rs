//! Shared building blocks for interstitch.
//!
//! This crate holds the typed identifiers used across the workspace and the
//! generation guard primitive that implements cooperative cancellation for
//! superseded asynchronous operations.

pub mod generation;
pub mod ids;

pub use generation::{Generation, Ticket};
pub use ids::{EntryId, ProjectId};
