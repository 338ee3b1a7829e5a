//! HTTP client for the event-settings API.
//!
//! [`EventSettingsClient`] speaks the JSON API directly and implements
//! [`evset_editor::EventSettingsApi`], so it can back a
//! [`SyncController`](evset_editor::sync::SyncController).

pub mod config;
pub mod error;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use evset_common::profile::FieldProfile;
use evset_common::types::{Condition, EventSettingGroup};
use evset_editor::EventSettingsApi;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

const EVENT_SETTINGS_PATH: &str = "/event-settings";
const FIELD_PROFILES_PATH: &str = "/field-profiles";

/// `POST /event-settings` answers with either a bare number or `{"id": n}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CreateResponse {
    Bare(i64),
    Wrapped { id: i64 },
}

/// Error envelope of the reference server.
#[derive(Deserialize)]
struct ErrorBody {
    err_msg: String,
}

pub struct EventSettingsClient {
    base_url: String,
    bearer_token: Option<String>,
    client: Client,
}

impl EventSettingsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_groups(&self) -> Result<Vec<EventSettingGroup>> {
        let resp = self
            .send("GET", EVENT_SETTINGS_PATH, self.client.get(self.url(EVENT_SETTINGS_PATH)))
            .await?;
        let groups = resp.json::<Vec<EventSettingGroup>>().await?;
        tracing::debug!(groups = groups.len(), "Fetched event settings");
        Ok(groups)
    }

    pub async fn create_condition(&self, condition: &Condition) -> Result<i64> {
        let req = self.client.post(self.url(EVENT_SETTINGS_PATH)).json(condition);
        let resp = self.send("POST", EVENT_SETTINGS_PATH, req).await?;
        let body = resp.text().await?;
        let id = match serde_json::from_str::<CreateResponse>(&body) {
            Ok(CreateResponse::Bare(id) | CreateResponse::Wrapped { id }) => id,
            Err(_) => {
                return Err(ClientError::InvalidResponse(format!(
                    "expected a numeric id, got '{body}'"
                )))
            }
        };
        tracing::debug!(id, field_key = %condition.field_key, "Created event setting");
        Ok(id)
    }

    pub async fn update_condition(&self, id: i64, condition: &Condition) -> Result<()> {
        let path = format!("{EVENT_SETTINGS_PATH}/{id}");
        let req = self.client.patch(self.url(&path)).json(condition);
        self.send("PATCH", &path, req).await?;
        tracing::debug!(id, "Updated event setting");
        Ok(())
    }

    pub async fn delete_condition(&self, id: i64) -> Result<()> {
        let path = format!("{EVENT_SETTINGS_PATH}/{id}");
        self.send("DELETE", &path, self.client.delete(self.url(&path)))
            .await?;
        tracing::debug!(id, "Deleted event setting");
        Ok(())
    }

    /// Field profile catalog served by the API.
    pub async fn field_profiles(&self) -> Result<Vec<FieldProfile>> {
        let resp = self
            .send("GET", FIELD_PROFILES_PATH, self.client.get(self.url(FIELD_PROFILES_PATH)))
            .await?;
        Ok(resp.json::<Vec<FieldProfile>>().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and turns non-2xx answers into
    /// [`ClientError::Status`], preferring the server's `err_msg`.
    async fn send(
        &self,
        method: &'static str,
        path: &str,
        mut req: RequestBuilder,
    ) -> Result<Response> {
        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp
            .text()
            .await
            .unwrap_or_else(|e| format!("[Failed to read response body: {e}]"));
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.err_msg)
            .unwrap_or(body);
        tracing::warn!(method, path, status = status.as_u16(), message = %message, "Event settings request rejected");
        Err(ClientError::Status {
            method,
            path: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl EventSettingsApi for EventSettingsClient {
    async fn list(&self) -> anyhow::Result<Vec<EventSettingGroup>> {
        Ok(self.list_groups().await?)
    }

    async fn create(&self, condition: &Condition) -> anyhow::Result<i64> {
        Ok(self.create_condition(condition).await?)
    }

    async fn update(&self, id: i64, condition: &Condition) -> anyhow::Result<()> {
        Ok(self.update_condition(id, condition).await?)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        Ok(self.delete_condition(id).await?)
    }
}
