// message.rs — structured view of one raw Gmail message.

use std::collections::BTreeSet;

use anyhow::Context;
use base64::Engine;

use crate::gmail::RawMessage;
use crate::sanitize;

const TEXT_PLAIN: &str = "text/plain";

/// One fetched message, reduced to the fields the classifier looks at.
/// Built per message and consumed immediately; never persisted.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    pub subject: String,
    pub to: String,
    pub from: String,
    pub cc: Option<String>,
    pub labels: BTreeSet<String>,
    /// Sanitized plain-text body; empty for HTML-only messages.
    pub body: String,
}

impl ParsedMessage {
    /// Subject, To and From are mandatory: a message we cannot attribute is
    /// never classified (and therefore never trashed).
    pub fn from_raw(raw: &RawMessage) -> anyhow::Result<Self> {
        let subject = header_value(raw, "Subject").context("missing Subject header")?;
        let to = header_value(raw, "To").context("missing To header")?;
        let from = header_value(raw, "From").context("missing From header")?;
        let cc = header_value(raw, "Cc");

        Ok(Self {
            subject,
            to,
            from,
            cc,
            labels: raw.label_ids.iter().cloned().collect(),
            body: extract_body(raw),
        })
    }
}

fn header_value(raw: &RawMessage, name: &str) -> Option<String> {
    raw.payload
        .headers
        .iter()
        .find(|h| h.name == name)
        .map(|h| h.value.clone())
}

/// First text/plain part wins; anything else (HTML-only, attachments-only)
/// yields an empty body. Gmail ships part data urlsafe-base64 encoded.
fn extract_body(raw: &RawMessage) -> String {
    for part in &raw.payload.parts {
        if part.mime_type != TEXT_PLAIN {
            continue;
        }
        let Some(data) = part.body.data.as_deref() else {
            continue;
        };
        // Gmail pads inconsistently; strip padding and decode pad-free.
        let decoded = match base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(data.trim_end_matches('='))
        {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("undecodable {TEXT_PLAIN} part, treating body as empty: {e}");
                return String::new();
            }
        };
        return sanitize::sanitize(&String::from_utf8_lossy(&decoded));
    }
    String::new()
}
