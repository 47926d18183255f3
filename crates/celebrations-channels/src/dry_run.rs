//! Dry-run notifier: logs what would be sent and never touches the network.

use async_trait::async_trait;
use celebrations_core::error::Result;
use celebrations_core::traits::Notifier;

#[derive(Debug, Default)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    fn name(&self) -> &str { "dry-run" }

    async fn send_channel_message(&self, channel: &str, text: &str) -> Result<()> {
        tracing::info!("[dry-run] channel #{channel}: {text}");
        Ok(())
    }

    async fn send_direct_message(&self, member_id: &str, text: &str) -> Result<()> {
        tracing::info!("[dry-run] DM {member_id}: {text}");
        Ok(())
    }

    async fn set_personal_reminder(&self, member_id: &str, time: &str, text: &str) -> Result<()> {
        tracing::info!("[dry-run] reminder for {member_id} at {time}: {text}");
        Ok(())
    }
}
