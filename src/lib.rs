//! Interstitch - interactive layer for stitched-playlist playback
//!
//! Embeds an external branching-decision engine inside a host player that
//! plays discrete video assets stitched into one continuous timeline. The
//! engine reasons in segment-local time; the host reports only a global
//! clock. This crate keeps the two consistent under seek jitter and
//! fragment rounding, and runs the engine's load/enable/disable lifecycle
//! with cooperative, generation-guarded cancellation.

pub mod config;
pub mod controller;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod partner;
pub mod session;

pub use controller::InteractiveController;
pub use delegate::PlayerDelegate;
pub use error::{Error, Result};
pub use events::PlayerEvent;
pub use session::SessionStatus;
