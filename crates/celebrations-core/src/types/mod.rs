//! Core domain types.

pub mod event;
pub mod person;

pub use event::{DigestEvent, Event, EventKind, PersonalKind};
pub use person::{DATE_FORMAT, Person, PersonEntry};
