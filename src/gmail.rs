// gmail.rs — thin Gmail REST v1 collaborator behind the Mailbox trait.
//
// Credentials are somebody else's problem: the client consumes a ready
// bearer token. Everything here is a dumb request/response wrapper; all
// recovery decisions live in the sweep loop.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::config;

/// The mailbox operations the sweep needs. Implemented by `GmailClient` in
/// production and by stubs in tests.
pub trait Mailbox {
    fn list_unread(&self, page_token: Option<&str>) -> anyhow::Result<MessagePage>;
    fn get_message(&self, id: &str) -> anyhow::Result<RawMessage>;
    fn trash_message(&self, id: &str) -> anyhow::Result<()>;
}

/// One page of unread message ids plus the continuation token, if any.
#[derive(Debug, Default)]
pub struct MessagePage {
    pub ids: Vec<String>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    #[serde(default)]
    pub label_ids: Vec<String>,
    #[serde(default)]
    pub payload: Payload,
}

#[derive(Debug, Default, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub body: PartBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartBody {
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

pub struct GmailClient {
    base_url: String,
    bearer: String,
}

impl GmailClient {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(config::gmail::API_BASE, access_token)
    }

    pub fn with_base_url(base_url: &str, access_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: format!("Bearer {access_token}"),
        }
    }

    fn timeout() -> Duration {
        Duration::from_secs(config::http::REQUEST_TIMEOUT_SECS)
    }
}

impl Mailbox for GmailClient {
    fn list_unread(&self, page_token: Option<&str>) -> anyhow::Result<MessagePage> {
        let mut req = ureq::get(&format!("{}/messages", self.base_url))
            .timeout(Self::timeout())
            .set("Authorization", &self.bearer)
            .query("labelIds", config::gmail::UNREAD_LABEL);
        if let Some(token) = page_token {
            req = req.query("pageToken", token);
        }

        let resp: ListResponse = req
            .call()
            .context("unread listing request failed")?
            .into_json()
            .context("unread listing response was not valid JSON")?;

        Ok(MessagePage {
            ids: resp.messages.into_iter().map(|m| m.id).collect(),
            next_page_token: resp.next_page_token,
        })
    }

    fn get_message(&self, id: &str) -> anyhow::Result<RawMessage> {
        ureq::get(&format!("{}/messages/{id}", self.base_url))
            .timeout(Self::timeout())
            .set("Authorization", &self.bearer)
            .query("format", "full")
            .call()
            .with_context(|| format!("fetching message {id} failed"))?
            .into_json()
            .with_context(|| format!("message {id} response was not valid JSON"))
    }

    fn trash_message(&self, id: &str) -> anyhow::Result<()> {
        ureq::post(&format!("{}/messages/{id}/trash", self.base_url))
            .timeout(Self::timeout())
            .set("Authorization", &self.bearer)
            .call()
            .with_context(|| format!("trashing message {id} failed"))?;
        Ok(())
    }
}
