//! Personal Slack reminder for the lead on the birthday itself.

use async_trait::async_trait;
use celebrations_core::config::PersonalReminderConfig;
use celebrations_core::template::MessageTemplate;
use celebrations_core::types::Event;

use super::{EventHandler, HandlerContext, Tally};

pub struct BirthdayPersonalReminderHandler {
    time: String,
    template: MessageTemplate,
}

impl BirthdayPersonalReminderHandler {
    pub fn new(config: &PersonalReminderConfig) -> Self {
        Self {
            time: config.time.clone(),
            template: config.message_template.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for BirthdayPersonalReminderHandler {
    fn name(&self) -> &'static str { "birthday_personal_reminder" }

    async fn handle(&self, event: &Event<'_>, ctx: &HandlerContext<'_>) -> Tally {
        let Some(person) = event.person() else {
            unreachable!("{} routed a {} event", self.name(), event.kind());
        };
        let mut tally = Tally::default();

        let Some(lead) = person.lead() else {
            tally.skip(self.name(), event, "no lead configured");
            return tally;
        };

        let text = self.template.render(&[("person", person.slack_member_id.as_str())]);
        let result = ctx.notifier.set_personal_reminder(lead, &self.time, &text).await;
        tally.record(self.name(), event, lead, result);
        tally
    }
}
