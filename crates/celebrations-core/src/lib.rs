//! # Celebrations Core
//!
//! Shared building blocks for the celebrations workspace: the error type,
//! configuration, roster and event types, the [`Clock`] and the
//! [`Notifier`] capability the dispatch engine sends through.

pub mod clock;
pub mod config;
pub mod error;
pub mod template;
pub mod traits;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CelebrationsConfig, FeatureConfig, SlackConfig};
pub use error::{CelebrationsError, Result};
pub use template::MessageTemplate;
pub use traits::Notifier;
pub use types::{DigestEvent, Event, EventKind, Person, PersonalKind};
