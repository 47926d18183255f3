//! # Celebrations Engine
//!
//! Daily event detection and notification dispatch.
//!
//! ## Architecture
//! ```text
//! Clock + roster
//!   └── EventDetector ──► [Event]
//!                            └── Dispatcher ──► HandlerRegistry lookup
//!                                                 └── EventHandler ──► Notifier
//! ```

pub mod detector;
pub mod dispatcher;
pub mod format;
pub mod handlers;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use detector::EventDetector;
pub use dispatcher::{Dispatcher, RunReport};
pub use handlers::{EventHandler, HandlerContext, Tally};
pub use registry::HandlerRegistry;
