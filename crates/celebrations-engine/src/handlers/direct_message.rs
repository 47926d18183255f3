//! Direct-message reminders about birthdays, for leads and the always-notify list.

use async_trait::async_trait;
use celebrations_core::config::DirectMessageReminderConfig;
use celebrations_core::template::MessageTemplate;
use celebrations_core::types::{Event, PersonalKind};

use super::{EventHandler, HandlerContext, Tally};

/// DMs the person's lead, then every always-notify id, with the same text.
///
/// The lead DM is skipped when the person has no lead; the always-notify DMs
/// go out regardless, one per listed id.
pub struct BirthdayDirectMessageHandler {
    birthday_template: MessageTemplate,
    upcoming_template: MessageTemplate,
    days_before: u32,
    always_notify: Vec<String>,
}

impl BirthdayDirectMessageHandler {
    pub fn new(config: &DirectMessageReminderConfig) -> Self {
        Self {
            birthday_template: config.message_template.clone(),
            upcoming_template: config.pre_reminder_message_template.clone(),
            days_before: config.pre_reminder_days_before,
            always_notify: config.always_notify_slack_ids.clone(),
        }
    }

    fn message(&self, kind: PersonalKind, member_id: &str) -> String {
        match kind {
            PersonalKind::Birthday => self.birthday_template.render(&[("person", member_id)]),
            PersonalKind::UpcomingBirthday => {
                let days = self.days_before.to_string();
                self.upcoming_template
                    .render(&[("person", member_id), ("days", days.as_str())])
            }
            PersonalKind::Anniversary => {
                unreachable!("{} routed an anniversary event", self.name())
            }
        }
    }
}

#[async_trait]
impl EventHandler for BirthdayDirectMessageHandler {
    fn name(&self) -> &'static str { "birthday_direct_message" }

    async fn handle(&self, event: &Event<'_>, ctx: &HandlerContext<'_>) -> Tally {
        let Event::Personal { kind, person } = event else {
            unreachable!("{} routed a {} event", self.name(), event.kind());
        };
        let text = self.message(*kind, &person.slack_member_id);
        let mut tally = Tally::default();

        match person.lead() {
            Some(lead) => {
                let result = ctx.notifier.send_direct_message(lead, &text).await;
                tally.record(self.name(), event, lead, result);
            }
            None => tally.skip(self.name(), event, "no lead configured"),
        }

        for id in &self.always_notify {
            let result = ctx.notifier.send_direct_message(id, &text).await;
            tally.record(self.name(), event, id, result);
        }

        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingNotifier};
    use celebrations_core::types::Person;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn handler(always_notify: &[&str]) -> BirthdayDirectMessageHandler {
        BirthdayDirectMessageHandler::new(&DirectMessageReminderConfig {
            enabled: true,
            message_template: MessageTemplate::parse("<@{person}> is having birthday!").unwrap(),
            pre_reminder_days_before: 3,
            pre_reminder_message_template: MessageTemplate::parse(
                "<@{person}> is having birthday in {days} days!",
            )
            .unwrap(),
            always_notify_slack_ids: always_notify.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn person(lead: Option<&str>) -> Person {
        let p = Person::new("A", date(1994, 6, 4), date(2011, 1, 1));
        match lead {
            Some(lead) => p.with_lead(lead),
            None => p,
        }
    }

    #[tokio::test]
    async fn test_birthday_dm_to_lead_then_always_notify() {
        let notifier = RecordingNotifier::new();
        let ctx = HandlerContext { today: date(2016, 6, 4), notifier: &notifier };
        let p = person(Some("L"));

        let tally = handler(&["X", "Y"])
            .handle(&Event::personal(PersonalKind::Birthday, &p), &ctx)
            .await;

        assert_eq!(tally.delivered, 3);
        assert_eq!(
            notifier.calls(),
            vec![
                Call::direct("L", "<@A> is having birthday!"),
                Call::direct("X", "<@A> is having birthday!"),
                Call::direct("Y", "<@A> is having birthday!"),
            ]
        );
    }

    #[tokio::test]
    async fn test_upcoming_birthday_uses_pre_reminder_template() {
        let notifier = RecordingNotifier::new();
        let ctx = HandlerContext { today: date(2016, 6, 1), notifier: &notifier };
        let p = person(Some("L"));

        handler(&[])
            .handle(&Event::personal(PersonalKind::UpcomingBirthday, &p), &ctx)
            .await;

        assert_eq!(
            notifier.calls(),
            vec![Call::direct("L", "<@A> is having birthday in 3 days!")]
        );
    }

    #[tokio::test]
    async fn test_no_lead_still_notifies_always_list() {
        let notifier = RecordingNotifier::new();
        let ctx = HandlerContext { today: date(2016, 6, 4), notifier: &notifier };
        let p = person(None);

        let tally = handler(&["X"])
            .handle(&Event::personal(PersonalKind::Birthday, &p), &ctx)
            .await;

        assert_eq!(tally, Tally { delivered: 1, failed: 0, skipped: 1 });
        assert_eq!(notifier.calls(), vec![Call::direct("X", "<@A> is having birthday!")]);
    }

    #[tokio::test]
    async fn test_every_listed_id_is_messaged_even_the_lead() {
        let notifier = RecordingNotifier::new();
        let ctx = HandlerContext { today: date(2016, 6, 4), notifier: &notifier };
        let p = person(Some("L"));

        let tally = handler(&["L", "X", "X"])
            .handle(&Event::personal(PersonalKind::Birthday, &p), &ctx)
            .await;
        assert_eq!(tally.delivered, 4);

        let targets: Vec<String> = notifier
            .calls()
            .into_iter()
            .map(|c| match c {
                Call::Direct { member_id, .. } => member_id,
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(targets, vec!["L", "L", "X", "X"]);
    }

    #[tokio::test]
    async fn test_failed_lead_dm_does_not_stop_others() {
        let notifier = RecordingNotifier::failing_on(&[0]);
        let ctx = HandlerContext { today: date(2016, 6, 4), notifier: &notifier };
        let p = person(Some("L"));

        let tally = handler(&["X", "Y"])
            .handle(&Event::personal(PersonalKind::Birthday, &p), &ctx)
            .await;

        assert_eq!(tally, Tally { delivered: 2, failed: 1, skipped: 0 });
        assert_eq!(notifier.calls().len(), 3);
    }
}
