//! Celebration events detected for a single run.

use super::Person;

/// Routing key used by the handler registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Anniversary,
    Birthday,
    UpcomingBirthday,
    MonthlyDigest,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Anniversary,
        EventKind::Birthday,
        EventKind::UpcomingBirthday,
        EventKind::MonthlyDigest,
    ];
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Anniversary => write!(f, "anniversary"),
            EventKind::Birthday => write!(f, "birthday"),
            EventKind::UpcomingBirthday => write!(f, "upcoming_birthday"),
            EventKind::MonthlyDigest => write!(f, "monthly_digest"),
        }
    }
}

/// Kinds of events that concern exactly one person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonalKind {
    Birthday,
    UpcomingBirthday,
    Anniversary,
}

impl From<PersonalKind> for EventKind {
    fn from(kind: PersonalKind) -> Self {
        match kind {
            PersonalKind::Birthday => EventKind::Birthday,
            PersonalKind::UpcomingBirthday => EventKind::UpcomingBirthday,
            PersonalKind::Anniversary => EventKind::Anniversary,
        }
    }
}

/// Monthly summary of everyone celebrating in the current month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestEvent<'a> {
    pub birthdays: Vec<&'a Person>,
    pub anniversaries: Vec<&'a Person>,
}

/// A celebration event. Borrows people from the roster for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    Personal {
        kind: PersonalKind,
        person: &'a Person,
    },
    Digest(DigestEvent<'a>),
}

impl<'a> Event<'a> {
    pub fn personal(kind: PersonalKind, person: &'a Person) -> Self {
        Event::Personal { kind, person }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Personal { kind, .. } => (*kind).into(),
            Event::Digest(_) => EventKind::MonthlyDigest,
        }
    }

    pub fn person(&self) -> Option<&'a Person> {
        match self {
            Event::Personal { person, .. } => Some(person),
            Event::Digest(_) => None,
        }
    }

    /// Identifier used in log lines.
    pub fn subject(&self) -> &str {
        match self {
            Event::Personal { person, .. } => &person.slack_member_id,
            Event::Digest(_) => "roster",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn person() -> Person {
        Person::new(
            "U1",
            NaiveDate::from_ymd_opt(1990, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 6, 5).unwrap(),
        )
    }

    #[test]
    fn test_event_kind() {
        let p = person();
        assert_eq!(
            Event::personal(PersonalKind::UpcomingBirthday, &p).kind(),
            EventKind::UpcomingBirthday
        );
        assert_eq!(
            Event::Digest(DigestEvent::default()).kind(),
            EventKind::MonthlyDigest
        );
    }

    #[test]
    fn test_event_person_and_subject() {
        let p = person();
        let event = Event::personal(PersonalKind::Anniversary, &p);
        assert_eq!(event.person().map(|p| p.slack_member_id.as_str()), Some("U1"));
        assert_eq!(event.subject(), "U1");

        let digest = Event::Digest(DigestEvent::default());
        assert!(digest.person().is_none());
        assert_eq!(digest.subject(), "roster");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(EventKind::MonthlyDigest.to_string(), "monthly_digest");
        assert_eq!(EventKind::Birthday.to_string(), "birthday");
    }
}
