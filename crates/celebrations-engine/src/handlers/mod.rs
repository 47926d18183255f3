//! Notification handlers, one per notification feature.
//!
//! | Handler | Events | Sends |
//! |---------|--------|-------|
//! | anniversary_channel | Anniversary | channel post with tenure |
//! | birthday_channel | Birthday | channel post |
//! | birthday_direct_message | Birthday, UpcomingBirthday | DM to the lead and the always-notify list |
//! | birthday_personal_reminder | Birthday | reminder for the lead |
//! | monthly_digest | MonthlyDigest | one channel post listing the month |

pub mod channel;
pub mod digest;
pub mod direct_message;
pub mod personal_reminder;

pub use channel::{AnniversaryChannelHandler, BirthdayChannelHandler};
pub use digest::MonthlyDigestHandler;
pub use direct_message::BirthdayDirectMessageHandler;
pub use personal_reminder::BirthdayPersonalReminderHandler;

use async_trait::async_trait;
use celebrations_core::error::Result;
use celebrations_core::traits::Notifier;
use celebrations_core::types::Event;
use chrono::NaiveDate;

/// Everything a handler may use besides the event itself.
pub struct HandlerContext<'a> {
    pub today: NaiveDate,
    pub notifier: &'a dyn Notifier,
}

/// Delivery counts from one or more handler invocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub delivered: usize,
    pub failed: usize,
    /// Sends that did not apply, e.g. a lead-directed send for a person without a lead.
    pub skipped: usize,
}

impl Tally {
    pub fn merge(&mut self, other: Tally) {
        self.delivered += other.delivered;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    /// Count one send and log its outcome. Failures never propagate.
    pub fn record(&mut self, handler: &str, event: &Event<'_>, target: &str, result: Result<()>) {
        match result {
            Ok(()) => {
                self.delivered += 1;
                tracing::info!(
                    "{handler}: sent {} notification for {} to {target}",
                    event.kind(),
                    event.subject()
                );
            }
            Err(e) => {
                self.failed += 1;
                tracing::error!(
                    "{handler}: failed to deliver {} notification for {} to {target}: {e}",
                    event.kind(),
                    event.subject()
                );
            }
        }
    }

    pub fn skip(&mut self, handler: &str, event: &Event<'_>, reason: &str) {
        self.skipped += 1;
        tracing::warn!("{handler}: skipped {} for {}: {reason}", event.kind(), event.subject());
    }
}

/// A notification feature reacting to events routed to it by the registry.
#[async_trait]
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Perform this handler's sends for `event`. Delivery failures are
    /// recorded in the returned tally, not returned as errors.
    async fn handle(&self, event: &Event<'_>, ctx: &HandlerContext<'_>) -> Tally;
}

#[cfg(test)]
mod tests {
    use super::*;
    use celebrations_core::error::CelebrationsError;
    use celebrations_core::types::{DigestEvent, Person, PersonalKind};

    #[test]
    fn test_tally_record_and_merge() {
        let person = Person::new(
            "A",
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        );
        let event = Event::personal(PersonalKind::Birthday, &person);

        let mut tally = Tally::default();
        tally.record("test", &event, "C1", Ok(()));
        tally.record("test", &event, "C1", Err(CelebrationsError::channel("boom")));
        tally.skip("test", &event, "no lead");
        assert_eq!(tally, Tally { delivered: 1, failed: 1, skipped: 1 });

        let mut total = Tally::default();
        total.merge(tally);
        total.merge(tally);
        assert_eq!(total, Tally { delivered: 2, failed: 2, skipped: 2 });

        let digest = Event::Digest(DigestEvent::default());
        let mut tally = Tally::default();
        tally.record("test", &digest, "C1", Ok(()));
        assert_eq!(tally.delivered, 1);
    }
}
