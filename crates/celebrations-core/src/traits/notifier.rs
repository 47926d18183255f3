//! Notifier trait — the outbound capability the dispatcher talks to.

use async_trait::async_trait;

use crate::error::Result;

/// Delivers notifications on a chat platform.
///
/// Every call may fail with a transport or API error; callers treat all
/// failures the same way (log and move on).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifier name (e.g., "slack", "dry-run").
    fn name(&self) -> &str;

    /// Post a message to a named channel.
    async fn send_channel_message(&self, channel: &str, text: &str) -> Result<()>;

    /// Send a direct message to a member.
    async fn send_direct_message(&self, member_id: &str, text: &str) -> Result<()>;

    /// Set a reminder for a member at a platform time-of-day expression
    /// (e.g. "9am", "15:00").
    async fn set_personal_reminder(&self, member_id: &str, time: &str, text: &str)
    -> Result<()>;
}
