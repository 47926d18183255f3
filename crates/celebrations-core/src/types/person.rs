//! Roster entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CelebrationsError;

/// Date layout used in config and roster files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A tracked person. Dates carry no time-of-day component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersonEntry", into = "PersonEntry")]
pub struct Person {
    pub name: Option<String>,
    pub slack_member_id: String,
    pub birth_date: NaiveDate,
    pub join_date: NaiveDate,
    /// Manager's member id. `None` disables lead-directed notifications.
    pub lead_slack_member_id: Option<String>,
}

impl Person {
    pub fn new(
        slack_member_id: impl Into<String>,
        birth_date: NaiveDate,
        join_date: NaiveDate,
    ) -> Self {
        Self {
            name: None,
            slack_member_id: slack_member_id.into(),
            birth_date,
            join_date,
            lead_slack_member_id: None,
        }
    }

    pub fn with_lead(mut self, lead: impl Into<String>) -> Self {
        self.lead_slack_member_id = Some(lead.into());
        self
    }

    pub fn lead(&self) -> Option<&str> {
        self.lead_slack_member_id.as_deref()
    }
}

/// On-disk shape of a roster entry.
///
/// `download-users` writes these with empty dates when Slack has no value,
/// so every field is optional here and checked when converting to [`Person`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub slack_member_id: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub join_date: String,
    #[serde(default)]
    pub lead_slack_member_id: String,
}

impl TryFrom<PersonEntry> for Person {
    type Error = CelebrationsError;

    fn try_from(entry: PersonEntry) -> Result<Self, Self::Error> {
        let id = entry.slack_member_id.trim().to_string();
        if id.is_empty() {
            return Err(CelebrationsError::config("Missing slack_member_id"));
        }
        let birth_date = parse_date(&entry.birth_date, "birth_date", &id)?;
        let join_date = parse_date(&entry.join_date, "join_date", &id)?;
        let lead = entry.lead_slack_member_id.trim();

        Ok(Self {
            name: entry.name.filter(|n| !n.is_empty()),
            slack_member_id: id,
            birth_date,
            join_date,
            lead_slack_member_id: (!lead.is_empty()).then(|| lead.to_string()),
        })
    }
}

impl From<Person> for PersonEntry {
    fn from(person: Person) -> Self {
        Self {
            name: person.name,
            slack_member_id: person.slack_member_id,
            birth_date: person.birth_date.format(DATE_FORMAT).to_string(),
            join_date: person.join_date.format(DATE_FORMAT).to_string(),
            lead_slack_member_id: person.lead_slack_member_id.unwrap_or_default(),
        }
    }
}

fn parse_date(raw: &str, field: &str, id: &str) -> Result<NaiveDate, CelebrationsError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CelebrationsError::config(format!(
            "Missing {field} for slack_member_id: {id}"
        )));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        CelebrationsError::config(format!(
            "Invalid {field} '{raw}' for slack_member_id {id}: {e}"
        ))
    })
}
