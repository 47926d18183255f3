//! Handler registry: event kind → ordered list of enabled handlers.
//!
//! Built from the feature flags once per run, as a plain value. Handlers for
//! one kind run in this order:
//!
//! | Kind | Handlers |
//! |------|----------|
//! | Anniversary | anniversary_channel |
//! | Birthday | birthday_channel, birthday_direct_message, birthday_personal_reminder |
//! | UpcomingBirthday | birthday_direct_message |
//! | MonthlyDigest | monthly_digest |

use std::collections::BTreeMap;
use std::sync::Arc;

use celebrations_core::config::FeatureConfig;
use celebrations_core::types::EventKind;

use crate::handlers::{
    AnniversaryChannelHandler, BirthdayChannelHandler, BirthdayDirectMessageHandler,
    BirthdayPersonalReminderHandler, EventHandler, MonthlyDigestHandler,
};

#[derive(Default)]
pub struct HandlerRegistry {
    routes: BTreeMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the handlers of `kind`.
    pub fn register(&mut self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        tracing::debug!("Registered handler {} for {kind}", handler.name());
        self.routes.entry(kind).or_default().push(handler);
    }

    /// Registry with every enabled feature, in the documented order.
    pub fn from_config(features: &FeatureConfig) -> Self {
        let mut reg = Self::new();

        if features.anniversary_channel_reminder.enabled {
            reg.register(
                EventKind::Anniversary,
                Arc::new(AnniversaryChannelHandler::new(&features.anniversary_channel_reminder)),
            );
        }

        if features.birthdays_channel_reminder.enabled {
            reg.register(
                EventKind::Birthday,
                Arc::new(BirthdayChannelHandler::new(&features.birthdays_channel_reminder)),
            );
        }
        if features.birthdays_direct_message_reminder.enabled {
            let dm: Arc<dyn EventHandler> = Arc::new(BirthdayDirectMessageHandler::new(
                &features.birthdays_direct_message_reminder,
            ));
            reg.register(EventKind::Birthday, Arc::clone(&dm));
            reg.register(EventKind::UpcomingBirthday, dm);
        }
        if features.birthdays_personal_reminder.enabled {
            reg.register(
                EventKind::Birthday,
                Arc::new(BirthdayPersonalReminderHandler::new(
                    &features.birthdays_personal_reminder,
                )),
            );
        }

        if features.monthly_report.enabled {
            reg.register(
                EventKind::MonthlyDigest,
                Arc::new(MonthlyDigestHandler::new(&features.monthly_report)),
            );
        }

        reg
    }

    /// Handlers for `kind` in invocation order. Empty when none are enabled.
    pub fn handlers_for(&self, kind: EventKind) -> &[Arc<dyn EventHandler>] {
        self.routes.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn handler_names(&self, kind: EventKind) -> Vec<&'static str> {
        self.handlers_for(kind).iter().map(|h| h.name()).collect()
    }

    /// Number of (kind, handler) routes.
    pub fn count(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }
}
