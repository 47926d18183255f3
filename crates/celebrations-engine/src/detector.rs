//! Event detection: which celebrations fire on a given date.
//!
//! Detection is pure computation over the in-memory roster. Per-person checks
//! run as a rayon parallel map; results are reduced into one list whose order
//! handlers must not rely on.

use celebrations_core::config::FeatureConfig;
use celebrations_core::types::{DigestEvent, Event, Person, PersonalKind};
use chrono::{Datelike, Days, NaiveDate};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventDetector {
    /// Days before a birthday the pre-reminder fires. `None` when nothing
    /// consumes pre-reminders.
    pre_reminder_days: Option<u32>,
    digest_enabled: bool,
}

impl EventDetector {
    pub fn new(pre_reminder_days: Option<u32>, digest_enabled: bool) -> Self {
        Self {
            pre_reminder_days,
            digest_enabled,
        }
    }

    pub fn from_config(features: &FeatureConfig) -> Self {
        let dm = &features.birthdays_direct_message_reminder;
        Self::new(
            dm.enabled.then_some(dm.pre_reminder_days_before),
            features.monthly_report.enabled,
        )
    }

    /// Personal events for one person. Between zero and three events.
    pub fn events_for_person<'a>(&self, person: &'a Person, today: NaiveDate) -> Vec<Event<'a>> {
        let mut events = Vec::new();

        if let Some(days) = self.pre_reminder_days {
            let reminder_day = person.birth_date.checked_sub_days(Days::new(u64::from(days)));
            if reminder_day.is_some_and(|d| same_day(d, today)) {
                events.push(Event::personal(PersonalKind::UpcomingBirthday, person));
            }
        }
        if same_day(person.birth_date, today) {
            events.push(Event::personal(PersonalKind::Birthday, person));
        }
        if same_day(person.join_date, today) {
            events.push(Event::personal(PersonalKind::Anniversary, person));
        }

        events
    }

    /// Personal events for the whole roster.
    pub fn personal_events<'a>(&self, roster: &'a [Person], today: NaiveDate) -> Vec<Event<'a>> {
        roster
            .par_iter()
            .map(|person| self.events_for_person(person, today))
            .flatten_iter()
            .collect()
    }

    /// The digest event, only on the first day of the month and when enabled.
    pub fn digest_event<'a>(&self, roster: &'a [Person], today: NaiveDate) -> Option<Event<'a>> {
        if !self.digest_enabled || today.day() != 1 {
            return None;
        }

        let month = today.month();
        let digest = DigestEvent {
            birthdays: roster.iter().filter(|p| p.birth_date.month() == month).collect(),
            anniversaries: roster.iter().filter(|p| p.join_date.month() == month).collect(),
        };
        Some(Event::Digest(digest))
    }

    /// Every event for `today`: personal events first, then the digest.
    pub fn detect<'a>(&self, roster: &'a [Person], today: NaiveDate) -> Vec<Event<'a>> {
        let mut events = self.personal_events(roster, today);
        events.extend(self.digest_event(roster, today));
        events
    }
}

fn same_day(date: NaiveDate, today: NaiveDate) -> bool {
    date.month() == today.month() && date.day() == today.day()
}
