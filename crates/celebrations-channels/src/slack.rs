//! Slack Web API client used for delivery and roster download.
//!
//! Slack answers most failures with HTTP 200 and `{"ok": false, "error": ...}`,
//! so every response body is checked, not just the status.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use celebrations_core::config::SlackConfig;
use celebrations_core::error::{CelebrationsError, Result};
use celebrations_core::traits::Notifier;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const USERS_PAGE_SIZE: usize = 200;

pub struct SlackClient {
    api_url: String,
    bot_token: String,
    user_token: String,
    client: reqwest::Client,
}

impl SlackClient {
    pub fn new(config: &SlackConfig) -> Result<Self> {
        if config.bot_token.trim().is_empty() {
            return Err(CelebrationsError::config("Missing slack.bot_token"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("celebrations/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CelebrationsError::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            user_token: config.user_token.clone(),
            client,
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_url)
    }

    /// POST a JSON body to a Web API method.
    async fn post(&self, method: &str, token: &str, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.url(method))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CelebrationsError::Http(format!("Slack {method} request failed: {e}")))?;
        Self::parse(method, response).await
    }

    /// GET a Web API method with query parameters.
    async fn get(&self, method: &str, query: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .client
            .get(self.url(method))
            .bearer_auth(&self.bot_token)
            .query(query)
            .send()
            .await
            .map_err(|e| CelebrationsError::Http(format!("Slack {method} request failed: {e}")))?;
        Self::parse(method, response).await
    }

    async fn parse(method: &str, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CelebrationsError::Http(format!("Slack {method} {status}: {text}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CelebrationsError::Http(format!("Invalid Slack {method} response: {e}")))?;
        if body["ok"].as_bool() != Some(true) {
            let error = body["error"].as_str().unwrap_or("unknown_error");
            return Err(CelebrationsError::slack_api(method, error));
        }
        Ok(body)
    }

    /// Open (or reuse) the DM conversation with a member.
    async fn open_conversation(&self, member_id: &str) -> Result<String> {
        let body = self
            .post("conversations.open", &self.bot_token, json!({ "users": member_id }))
            .await?;
        body["channel"]["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| CelebrationsError::channel("conversations.open returned no channel id"))
    }

    /// Active workspace members, following pagination.
    pub async fn list_users(&self) -> Result<Vec<SlackMember>> {
        let mut members = Vec::new();
        let mut cursor = String::new();
        let limit = USERS_PAGE_SIZE.to_string();

        loop {
            let mut query = vec![("limit", limit.as_str())];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.as_str()));
            }
            let body = self.get("users.list", &query).await?;

            let page: Vec<SlackMember> = serde_json::from_value(body["members"].clone())?;
            members.extend(page);

            match body["response_metadata"]["next_cursor"].as_str() {
                Some(next) if !next.is_empty() => cursor = next.to_string(),
                _ => break,
            }
        }

        tracing::debug!("Fetched {} Slack members", members.len());
        Ok(members)
    }

    /// Custom profile fields of a member, keyed by field id.
    pub async fn profile_fields(&self, member_id: &str) -> Result<HashMap<String, String>> {
        let body = self.get("users.profile.get", &[("user", member_id)]).await?;

        // Slack sends `null` or `[]` when a profile has no custom fields.
        let mut fields = HashMap::new();
        if let Some(map) = body["profile"]["fields"].as_object() {
            for (id, field) in map {
                if let Some(value) = field["value"].as_str() {
                    fields.insert(id.clone(), value.to_string());
                }
            }
        }
        Ok(fields)
    }
}

#[async_trait]
impl Notifier for SlackClient {
    fn name(&self) -> &str { "slack" }

    async fn send_channel_message(&self, channel: &str, text: &str) -> Result<()> {
        let body = json!({
            "channel": channel,
            "attachments": [{ "pretext": text }],
        });
        self.post("chat.postMessage", &self.bot_token, body)
            .await
            .map_err(|e| CelebrationsError::channel(format!("Error sending message to Slack channel {channel}: {e}")))?;
        Ok(())
    }

    async fn send_direct_message(&self, member_id: &str, text: &str) -> Result<()> {
        let conversation = self.open_conversation(member_id).await.map_err(|e| {
            CelebrationsError::channel(format!(
                "Error opening Slack conversation with {member_id}: {e}"
            ))
        })?;

        let body = json!({ "channel": conversation, "text": text });
        self.post("chat.postMessage", &self.bot_token, body)
            .await
            .map_err(|e| CelebrationsError::channel(format!("Error sending DM to {member_id}: {e}")))?;
        Ok(())
    }

    async fn set_personal_reminder(&self, member_id: &str, time: &str, text: &str) -> Result<()> {
        if self.user_token.trim().is_empty() {
            return Err(CelebrationsError::config(
                "slack.user_token is required for personal reminders",
            ));
        }

        let body = json!({ "text": text, "time": time, "user": member_id });
        self.post("reminders.add", &self.user_token, body)
            .await
            .map_err(|e| CelebrationsError::channel(format!("Error setting Slack reminder for {member_id}: {e}")))?;
        Ok(())
    }
}

// --- Slack API Types ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackMember {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub profile: SlackProfile,
}

impl SlackMember {
    /// Display name, falling back to the real name and then the handle.
    pub fn display_name(&self) -> &str {
        [
            self.profile.display_name.as_str(),
            self.profile.real_name.as_str(),
            self.name.as_str(),
        ]
        .into_iter()
        .find(|n| !n.is_empty())
        .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub real_name: String,
}
