//! Roster download: Slack workspace members → people file.

use std::path::Path;

use celebrations_core::config::{DownloadingUsersConfig, PeopleFile};
use celebrations_core::error::Result;
use celebrations_core::types::PersonEntry;

use crate::slack::SlackClient;

/// Default `--limit` for `download-users`.
pub const DEFAULT_LIMIT: usize = 1000;

/// Default output path for `download-users`.
pub const DEFAULT_OUTPUT: &str = "people.toml";

/// Fetch up to `limit` active human members with their custom date fields.
///
/// Bots and deleted accounts are skipped and do not count toward the limit.
/// Dates are copied as Slack stores them; entries missing a date are still
/// written so they can be completed by hand. Lead ids are left empty.
pub async fn download_people(
    client: &SlackClient,
    fields: &DownloadingUsersConfig,
    limit: usize,
) -> Result<Vec<PersonEntry>> {
    let members = client.list_users().await?;

    let mut people = Vec::new();
    for member in members.iter().filter(|m| !m.is_bot && !m.deleted).take(limit) {
        let profile = client.profile_fields(&member.id).await?;
        let field = |id: &str| profile.get(id).cloned().unwrap_or_default();

        let entry = PersonEntry {
            name: Some(member.display_name().to_string()).filter(|n| !n.is_empty()),
            slack_member_id: member.id.clone(),
            birth_date: field(&fields.birthday_custom_field_name),
            join_date: field(&fields.join_date_custom_field_name),
            lead_slack_member_id: String::new(),
        };
        if entry.birth_date.is_empty() || entry.join_date.is_empty() {
            tracing::warn!("{} has no birth or join date in Slack", member.id);
        }
        people.push(entry);
    }

    Ok(people)
}

/// Write `people` as a TOML people file, replacing any existing file.
pub fn write_people_file(path: &Path, people: Vec<PersonEntry>) -> Result<()> {
    let content = toml::to_string_pretty(&PeopleFile { people })?;
    std::fs::write(path, content)?;
    Ok(())
}
