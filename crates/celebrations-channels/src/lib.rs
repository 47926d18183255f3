//! # Celebrations Channels
//!
//! Delivery backends behind the [`Notifier`](celebrations_core::Notifier)
//! port: the Slack Web API client and a logging dry-run notifier. Also the
//! Slack roster download used by `download-users`.

pub mod dry_run;
pub mod roster;
pub mod slack;

pub use dry_run::DryRunNotifier;
pub use slack::SlackClient;
