//! Dispatcher — one daily run from detection to delivery.
//!
//! ```text
//! CollectEvents ──► AppendDigestEvent (day 1, digest enabled) ──► RouteAndInvoke ──► Done
//! ```
//!
//! Nothing is persisted between phases. Handlers for one event run in
//! registry order; a failed delivery is logged and the run moves on, so a run
//! always completes.

use celebrations_core::clock::Clock;
use celebrations_core::config::FeatureConfig;
use celebrations_core::traits::Notifier;
use celebrations_core::types::{Event, Person};

use crate::detector::EventDetector;
use crate::handlers::{HandlerContext, Tally};
use crate::registry::HandlerRegistry;

/// Summary of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub events: usize,
    /// Events with no enabled handler.
    pub unhandled: usize,
    pub tally: Tally,
}

pub struct Dispatcher {
    detector: EventDetector,
    registry: HandlerRegistry,
}

impl Dispatcher {
    pub fn new(detector: EventDetector, registry: HandlerRegistry) -> Self {
        Self { detector, registry }
    }

    pub fn from_config(features: &FeatureConfig) -> Self {
        Self::new(
            EventDetector::from_config(features),
            HandlerRegistry::from_config(features),
        )
    }

    /// Detect today's events for `roster`, then invoke their handlers.
    pub async fn run(
        &self,
        clock: &dyn Clock,
        roster: &[Person],
        notifier: &dyn Notifier,
    ) -> RunReport {
        let today = clock.today();
        tracing::info!("{} people found in config, running for {today}", roster.len());

        tracing::debug!("Collecting personal events");
        let mut events = self.detector.personal_events(roster, today);

        if let Some(digest) = self.detector.digest_event(roster, today) {
            tracing::debug!("Appending monthly digest event");
            events.push(digest);
        }

        tracing::debug!("Routing {} events via {}", events.len(), notifier.name());
        let ctx = HandlerContext { today, notifier };
        let mut report = RunReport {
            events: events.len(),
            ..RunReport::default()
        };
        for event in &events {
            match self.invoke(event, &ctx).await {
                Some(tally) => report.tally.merge(tally),
                None => report.unhandled += 1,
            }
        }

        tracing::info!(
            "Run complete: {} events, {} sent, {} failed, {} skipped",
            report.events,
            report.tally.delivered,
            report.tally.failed,
            report.tally.skipped
        );
        report
    }

    async fn invoke(&self, event: &Event<'_>, ctx: &HandlerContext<'_>) -> Option<Tally> {
        let handlers = self.registry.handlers_for(event.kind());
        if handlers.is_empty() {
            tracing::debug!("No handlers enabled for {} ({})", event.kind(), event.subject());
            return None;
        }

        let mut tally = Tally::default();
        for handler in handlers {
            tally.merge(handler.handle(event, ctx).await);
        }
        Some(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingNotifier};
    use celebrations_core::clock::FixedClock;
    use celebrations_core::config::CelebrationsConfig;
    use chrono::NaiveDate;
    use std::path::Path;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn features() -> FeatureConfig {
        let config = CelebrationsConfig::parse(
            r#"
[slack.anniversary_channel_reminder]
enabled = true
channel_name = "celebrations"
message_template = "Happy anniversary <@{person}>! {years} in Company!"

[slack.birthdays_channel_reminder]
enabled = true
channel_name = "leaders"
message_template = "{person} is having birthday!"

[slack.birthdays_personal_reminder]
enabled = true
time = "15pm"
message_template = "{person} is having birthday!"

[slack.birthdays_direct_message_reminder]
enabled = true
message_template = "{person} is having birthday!"
pre_reminder_days_before = 3
pre_reminder_message_template = "{person} is having birthday in {days} days!"
always_notify_slack_ids = ["X"]

[slack.monthly_report]
enabled = true
channel_name = "leaders"
message_template = "Birthdays:\n{birthdays}\nAnniversaries:\n{anniversaries}"
"#,
            Path::new("."),
        )
        .unwrap();
        config.validate().unwrap();
        config.slack.features
    }

    #[tokio::test]
    async fn test_birthday_scenario_all_features() {
        let today = date(2016, 6, 2);
        let roster = vec![Person::new("A", date(1994, 6, 2), date(2011, 3, 4)).with_lead("L")];
        let notifier = RecordingNotifier::new();

        let report = Dispatcher::from_config(&features())
            .run(&FixedClock(today), &roster, &notifier)
            .await;

        assert_eq!(
            notifier.calls(),
            vec![
                Call::channel("leaders", "A is having birthday!"),
                Call::direct("L", "A is having birthday!"),
                Call::direct("X", "A is having birthday!"),
                Call::reminder("L", "15pm", "A is having birthday!"),
            ]
        );
        assert_eq!(report.events, 1);
        assert_eq!(report.tally, Tally { delivered: 4, failed: 0, skipped: 0 });
    }

    #[tokio::test]
    async fn test_first_failure_does_not_block_the_rest() {
        let today = date(2016, 6, 2);
        let roster = vec![
            Person::new("A", date(1994, 6, 2), date(2011, 3, 4)).with_lead("L"),
            Person::new("B", date(1990, 1, 1), date(2014, 6, 2)),
        ];
        let notifier = RecordingNotifier::failing_on(&[0]);

        let report = Dispatcher::from_config(&features())
            .run(&FixedClock(today), &roster, &notifier)
            .await;

        let calls = notifier.calls();
        assert_eq!(calls.len(), 5);
        assert!(calls.contains(&Call::reminder("L", "15pm", "A is having birthday!")));
        assert!(calls.contains(&Call::channel(
            "celebrations",
            "Happy anniversary <@B>! 2 years in Company!"
        )));
        assert_eq!(report.tally.failed, 1);
        assert_eq!(report.tally.delivered, 4);
    }

    #[tokio::test]
    async fn test_upcoming_birthday_dm_three_days_before() {
        let roster = vec![Person::new("A", date(1994, 6, 5), date(2011, 3, 4)).with_lead("L")];
        let notifier = RecordingNotifier::new();

        Dispatcher::from_config(&features())
            .run(&FixedClock(date(2016, 6, 2)), &roster, &notifier)
            .await;

        assert_eq!(
            notifier.calls(),
            vec![
                Call::direct("L", "A is having birthday in 3 days!"),
                Call::direct("X", "A is having birthday in 3 days!"),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_lead_skips_lead_sends_only() {
        let roster = vec![Person::new("A", date(1994, 6, 2), date(2011, 3, 4))];
        let notifier = RecordingNotifier::new();

        let report = Dispatcher::from_config(&features())
            .run(&FixedClock(date(2016, 6, 2)), &roster, &notifier)
            .await;

        assert_eq!(
            notifier.calls(),
            vec![
                Call::channel("leaders", "A is having birthday!"),
                Call::direct("X", "A is having birthday!"),
            ]
        );
        assert_eq!(report.tally, Tally { delivered: 2, failed: 0, skipped: 2 });
    }

    #[tokio::test]
    async fn test_digest_on_first_of_month() {
        let roster = vec![
            Person::new("B", date(1990, 6, 20), date(2014, 2, 2)),
            Person::new("A", date(1994, 6, 8), date(2011, 3, 4)),
        ];
        let notifier = RecordingNotifier::new();

        let report = Dispatcher::from_config(&features())
            .run(&FixedClock(date(2016, 6, 1)), &roster, &notifier)
            .await;

        assert_eq!(report.events, 1);
        assert_eq!(
            notifier.calls(),
            vec![Call::channel(
                "leaders",
                "Birthdays:\n8 June, <@A> 22 years old\n20 June, <@B> 26 years old\n\nAnniversaries:\n"
            )]
        );
    }

    #[tokio::test]
    async fn test_disabled_features_send_nothing() {
        let roster = vec![Person::new("A", date(1994, 6, 1), date(2011, 6, 1)).with_lead("L")];
        let notifier = RecordingNotifier::new();

        let report = Dispatcher::from_config(&FeatureConfig::default())
            .run(&FixedClock(date(2016, 6, 1)), &roster, &notifier)
            .await;

        assert!(notifier.calls().is_empty());
        assert_eq!(report.events, 2);
        assert_eq!(report.unhandled, 2);
    }

    #[tokio::test]
    async fn test_quiet_day() {
        let roster = vec![Person::new("A", date(1994, 8, 1), date(2011, 9, 1))];
        let notifier = RecordingNotifier::new();

        let report = Dispatcher::from_config(&features())
            .run(&FixedClock(date(2016, 6, 2)), &roster, &notifier)
            .await;

        assert_eq!(report, RunReport::default());
        assert!(notifier.calls().is_empty());
    }
}
