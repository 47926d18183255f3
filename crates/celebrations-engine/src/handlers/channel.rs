//! Channel posts for individual birthdays and anniversaries.

use async_trait::async_trait;
use celebrations_core::config::ChannelReminderConfig;
use celebrations_core::template::MessageTemplate;
use celebrations_core::types::Event;

use super::{EventHandler, HandlerContext, Tally};
use crate::format::{years_since, years_text};

/// Posts `{person}` / `{years}` anniversary wishes to a channel.
pub struct AnniversaryChannelHandler {
    channel: String,
    template: MessageTemplate,
}

impl AnniversaryChannelHandler {
    pub fn new(config: &ChannelReminderConfig) -> Self {
        Self {
            channel: config.channel_name.clone(),
            template: config.message_template.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for AnniversaryChannelHandler {
    fn name(&self) -> &'static str { "anniversary_channel" }

    async fn handle(&self, event: &Event<'_>, ctx: &HandlerContext<'_>) -> Tally {
        let Some(person) = event.person() else {
            unreachable!("{} routed a {} event", self.name(), event.kind());
        };
        let years = years_text(years_since(person.join_date, ctx.today));
        let text = self.template.render(&[
            ("person", person.slack_member_id.as_str()),
            ("years", years.as_str()),
        ]);

        let mut tally = Tally::default();
        let result = ctx.notifier.send_channel_message(&self.channel, &text).await;
        tally.record(self.name(), event, &self.channel, result);
        tally
    }
}

/// Posts a `{person}` birthday announcement to a channel.
pub struct BirthdayChannelHandler {
    channel: String,
    template: MessageTemplate,
}

impl BirthdayChannelHandler {
    pub fn new(config: &ChannelReminderConfig) -> Self {
        Self {
            channel: config.channel_name.clone(),
            template: config.message_template.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for BirthdayChannelHandler {
    fn name(&self) -> &'static str { "birthday_channel" }

    async fn handle(&self, event: &Event<'_>, ctx: &HandlerContext<'_>) -> Tally {
        let Some(person) = event.person() else {
            unreachable!("{} routed a {} event", self.name(), event.kind());
        };
        let text = self.template.render(&[("person", person.slack_member_id.as_str())]);

        let mut tally = Tally::default();
        let result = ctx.notifier.send_channel_message(&self.channel, &text).await;
        tally.record(self.name(), event, &self.channel, result);
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingNotifier};
    use celebrations_core::types::{Person, PersonalKind};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(channel: &str, template: &str) -> ChannelReminderConfig {
        ChannelReminderConfig {
            enabled: true,
            channel_name: channel.into(),
            message_template: MessageTemplate::parse(template).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_anniversary_post_with_tenure() {
        let notifier = RecordingNotifier::new();
        let ctx = HandlerContext { today: date(2016, 6, 1), notifier: &notifier };
        let handler = AnniversaryChannelHandler::new(&config(
            "celebrations",
            "Happy anniversary <@{person}>! {years} in Company!",
        ));

        let two_years = Person::new("U2", date(1990, 1, 1), date(2014, 6, 1));
        let one_year = Person::new("U1", date(1990, 1, 1), date(2015, 6, 1));
        let t1 = handler.handle(&Event::personal(PersonalKind::Anniversary, &two_years), &ctx).await;
        let t2 = handler.handle(&Event::personal(PersonalKind::Anniversary, &one_year), &ctx).await;

        assert_eq!(t1.delivered + t2.delivered, 2);
        assert_eq!(
            notifier.calls(),
            vec![
                Call::channel("celebrations", "Happy anniversary <@U2>! 2 years in Company!"),
                Call::channel("celebrations", "Happy anniversary <@U1>! 1 year in Company!"),
            ]
        );
    }

    #[tokio::test]
    async fn test_birthday_post() {
        let notifier = RecordingNotifier::new();
        let ctx = HandlerContext { today: date(2016, 6, 1), notifier: &notifier };
        let handler = BirthdayChannelHandler::new(&config("leaders", "{person} is having birthday!"));

        let person = Person::new("A", date(1994, 6, 1), date(2011, 1, 1));
        let tally = handler.handle(&Event::personal(PersonalKind::Birthday, &person), &ctx).await;

        assert_eq!(tally.delivered, 1);
        assert_eq!(notifier.calls(), vec![Call::channel("leaders", "A is having birthday!")]);
    }

    #[tokio::test]
    async fn test_failed_post_is_counted() {
        let notifier = RecordingNotifier::failing_on(&[0]);
        let ctx = HandlerContext { today: date(2016, 6, 1), notifier: &notifier };
        let handler = BirthdayChannelHandler::new(&config("leaders", "{person}"));

        let person = Person::new("A", date(1994, 6, 1), date(2011, 1, 1));
        let tally = handler.handle(&Event::personal(PersonalKind::Birthday, &person), &ctx).await;
        assert_eq!(tally, Tally { delivered: 0, failed: 1, skipped: 0 });
    }
}
