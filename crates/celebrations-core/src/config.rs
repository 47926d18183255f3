//! Configuration loading and validation.
//!
//! Config is read once per run from `config.toml` (or `--config <path>`),
//! merged with an optional roster file, overridden from the environment and
//! validated before anything is sent.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CelebrationsError, Result};
use crate::template::MessageTemplate;
use crate::types::Person;

pub const BOT_TOKEN_ENV: &str = "CELEBRATIONS_SLACK_BOT_TOKEN";
pub const USER_TOKEN_ENV: &str = "CELEBRATIONS_SLACK_USER_TOKEN";

const MASK: &str = "••••••••";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CelebrationsConfig {
    /// Extra roster file with `[[people]]` entries, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people_file: Option<PathBuf>,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub people: Vec<Person>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub user_token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub downloading_users: DownloadingUsersConfig,
    #[serde(flatten)]
    pub features: FeatureConfig,
}

fn default_api_url() -> String {
    "https://slack.com/api".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            user_token: String::new(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            downloading_users: DownloadingUsersConfig::default(),
            features: FeatureConfig::default(),
        }
    }
}

/// Per-feature flags, targets and templates. Every feature defaults to disabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default)]
    pub anniversary_channel_reminder: ChannelReminderConfig,
    #[serde(default)]
    pub birthdays_channel_reminder: ChannelReminderConfig,
    #[serde(default)]
    pub birthdays_personal_reminder: PersonalReminderConfig,
    #[serde(default)]
    pub birthdays_direct_message_reminder: DirectMessageReminderConfig,
    #[serde(default)]
    pub monthly_report: ChannelReminderConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelReminderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub channel_name: String,
    #[serde(default)]
    pub message_template: MessageTemplate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalReminderConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Slack reminder time expression, e.g. "9am".
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub message_template: MessageTemplate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectMessageReminderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub message_template: MessageTemplate,
    /// Days before the birthday the pre-reminder goes out. 0 disables it.
    #[serde(default)]
    pub pre_reminder_days_before: u32,
    #[serde(default, alias = "pre_remidner_message_template")]
    pub pre_reminder_message_template: MessageTemplate,
    #[serde(default)]
    pub always_notify_slack_ids: Vec<String>,
}

/// Slack custom profile field ids read by `download-users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadingUsersConfig {
    #[serde(default)]
    pub birthday_custom_field_name: String,
    #[serde(default)]
    pub join_date_custom_field_name: String,
}

/// Roster file layout written by `download-users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeopleFile<T> {
    #[serde(default = "Vec::new")]
    pub people: Vec<T>,
}

impl CelebrationsConfig {
    /// Default config path: `config.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load, merge the roster file, apply env overrides and validate.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CelebrationsError::ConfigNotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut config = Self::parse(&content, base_dir)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        tracing::debug!(
            "Loaded config from {} ({} people)",
            path.display(),
            config.people.len()
        );
        Ok(config)
    }

    /// Parse TOML and merge `people_file` (resolved against `base_dir`).
    /// Does not validate.
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;

        if let Some(file) = &config.people_file {
            let path = base_dir.join(file);
            let roster = std::fs::read_to_string(&path).map_err(|e| {
                CelebrationsError::config(format!(
                    "Cannot read people_file {}: {e}",
                    path.display()
                ))
            })?;
            let roster: PeopleFile<Person> = toml::from_str(&roster)?;
            config.people.extend(roster.people);
        }

        Ok(config)
    }

    /// Override tokens from `lookup` (the process environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(BOT_TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.slack.bot_token = token;
        }
        if let Some(token) = lookup(USER_TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.slack.user_token = token;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for person in &self.people {
            if !seen.insert(person.slack_member_id.as_str()) {
                return Err(CelebrationsError::config(format!(
                    "Duplicate slack_member_id: {}",
                    person.slack_member_id
                )));
            }
        }

        if self.slack.api_url.trim().is_empty() {
            return Err(CelebrationsError::config("slack.api_url must not be empty"));
        }
        if self.slack.timeout_secs == 0 {
            return Err(CelebrationsError::config("slack.timeout_secs must be at least 1"));
        }

        self.slack.features.validate()
    }

    /// Copy with tokens masked, for display.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        for token in [&mut copy.slack.bot_token, &mut copy.slack.user_token] {
            if !token.is_empty() {
                *token = MASK.into();
            }
        }
        copy
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<()> {
        check_channel_feature(
            "anniversary_channel_reminder",
            &self.anniversary_channel_reminder,
            &["person", "years"],
        )?;
        check_channel_feature(
            "birthdays_channel_reminder",
            &self.birthdays_channel_reminder,
            &["person"],
        )?;
        check_channel_feature(
            "monthly_report",
            &self.monthly_report,
            &["birthdays", "anniversaries"],
        )?;

        let personal = &self.birthdays_personal_reminder;
        if personal.enabled {
            if personal.time.trim().is_empty() {
                return Err(missing("birthdays_personal_reminder", "time"));
            }
            check_template(
                "birthdays_personal_reminder",
                "message_template",
                &personal.message_template,
                &["person"],
            )?;
        }

        let dm = &self.birthdays_direct_message_reminder;
        if dm.enabled {
            check_template(
                "birthdays_direct_message_reminder",
                "message_template",
                &dm.message_template,
                &["person"],
            )?;
            if dm.pre_reminder_days_before == 0 {
                return Err(CelebrationsError::config(
                    "slack.birthdays_direct_message_reminder.pre_reminder_days_before must be at least 1",
                ));
            }
            check_template(
                "birthdays_direct_message_reminder",
                "pre_reminder_message_template",
                &dm.pre_reminder_message_template,
                &["person", "days"],
            )?;
            if dm.always_notify_slack_ids.iter().any(|id| id.trim().is_empty()) {
                return Err(CelebrationsError::config(
                    "birthdays_direct_message_reminder.always_notify_slack_ids contains an empty id",
                ));
            }
        }

        Ok(())
    }
}

fn missing(section: &str, field: &str) -> CelebrationsError {
    CelebrationsError::config(format!("Missing slack.{section}.{field}"))
}

fn check_channel_feature(
    section: &str,
    feature: &ChannelReminderConfig,
    allowed: &[&str],
) -> Result<()> {
    if !feature.enabled {
        return Ok(());
    }
    if feature.channel_name.trim().is_empty() {
        return Err(missing(section, "channel_name"));
    }
    check_template(section, "message_template", &feature.message_template, allowed)
}

fn check_template(
    section: &str,
    field: &str,
    template: &MessageTemplate,
    allowed: &[&str],
) -> Result<()> {
    if template.is_empty() {
        return Err(missing(section, field));
    }
    template.check_placeholders(allowed).map_err(|e| {
        CelebrationsError::config(format!("slack.{section}.{field}: {e}"))
    })
}
