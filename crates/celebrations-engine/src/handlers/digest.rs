//! Monthly digest post.

use async_trait::async_trait;
use celebrations_core::config::ChannelReminderConfig;
use celebrations_core::template::MessageTemplate;
use celebrations_core::types::{DigestEvent, Event, Person};
use chrono::{Datelike, NaiveDate};

use super::{EventHandler, HandlerContext, Tally};
use crate::format::{day_month, mention, years_since, years_text};

/// Posts one message listing this month's birthdays and anniversaries,
/// each sorted by (month, day).
pub struct MonthlyDigestHandler {
    channel: String,
    template: MessageTemplate,
}

impl MonthlyDigestHandler {
    pub fn new(config: &ChannelReminderConfig) -> Self {
        Self {
            channel: config.channel_name.clone(),
            template: config.message_template.clone(),
        }
    }

    /// Render the `{birthdays}` and `{anniversaries}` sections.
    pub fn sections(digest: &DigestEvent<'_>, today: NaiveDate) -> (String, String) {
        let birthdays: String = sorted_by_day(&digest.birthdays, |p| p.birth_date)
            .into_iter()
            .map(|p| {
                format!(
                    "{}, {} {} years old\n",
                    day_month(p.birth_date),
                    mention(&p.slack_member_id),
                    years_since(p.birth_date, today)
                )
            })
            .collect();

        let anniversaries: String = sorted_by_day(&digest.anniversaries, |p| p.join_date)
            .into_iter()
            .map(|p| {
                format!(
                    "{}, {} {} in company\n",
                    day_month(p.join_date),
                    mention(&p.slack_member_id),
                    years_text(years_since(p.join_date, today))
                )
            })
            .collect();

        (birthdays, anniversaries)
    }
}

fn sorted_by_day<'a>(people: &[&'a Person], date: impl Fn(&Person) -> NaiveDate) -> Vec<&'a Person> {
    let mut sorted = people.to_vec();
    sorted.sort_by_key(|p| {
        let d = date(*p);
        (d.month(), d.day(), p.slack_member_id.clone())
    });
    sorted
}

#[async_trait]
impl EventHandler for MonthlyDigestHandler {
    fn name(&self) -> &'static str { "monthly_digest" }

    async fn handle(&self, event: &Event<'_>, ctx: &HandlerContext<'_>) -> Tally {
        let Event::Digest(digest) = event else {
            unreachable!("{} routed a {} event", self.name(), event.kind());
        };
        let (birthdays, anniversaries) = Self::sections(digest, ctx.today);
        let text = self.template.render(&[
            ("birthdays", birthdays.as_str()),
            ("anniversaries", anniversaries.as_str()),
        ]);

        let mut tally = Tally::default();
        let result = ctx.notifier.send_channel_message(&self.channel, &text).await;
        tally.record(self.name(), event, &self.channel, result);
        tally
    }
}
