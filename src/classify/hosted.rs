// hosted.rs — metered remote backend over the messages API.
//
// Deterministic decoding (temperature 0) and a bounded max_tokens keep the
// reply reproducible and the bill predictable. The same provider exposes
// the token counter the router prefers.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use super::{Backend, BackendKind, BackendReply};
use crate::config;

pub struct HostedBackend {
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CountTokensResponse {
    input_tokens: u32,
}

impl HostedBackend {
    pub fn new(base_url: &str, api_key: String, model: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    fn post(&self, path: &str) -> ureq::Request {
        ureq::post(&format!("{}{path}", self.base_url))
            .timeout(Duration::from_secs(config::http::REQUEST_TIMEOUT_SECS))
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", config::hosted::API_VERSION)
    }
}

impl Backend for HostedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Hosted
    }

    fn classify(&self, system_prompt: &str, user_prompt: &str) -> anyhow::Result<BackendReply> {
        let resp: MessagesResponse = self
            .post("/v1/messages")
            .send_json(serde_json::json!({
                "model": self.model,
                "max_tokens": config::hosted::MAX_OUTPUT_TOKENS,
                "temperature": 0,
                "system": system_prompt,
                "messages": [{ "role": "user", "content": user_prompt }],
            }))
            .context("hosted classify request failed")?
            .into_json()
            .context("hosted classify response was not valid JSON")?;

        let text: String = resp.content.iter().map(|b| b.text.as_str()).collect();
        Ok(BackendReply { text, output_tokens: resp.usage.output_tokens })
    }

    /// Ask the provider to count the prompt. None on any failure; the
    /// router then falls back to its local estimate.
    fn count_input_tokens(&self, system_prompt: &str, user_prompt: &str) -> Option<u32> {
        let result = self
            .post("/v1/messages/count_tokens")
            .send_json(serde_json::json!({
                "model": self.model,
                "system": system_prompt,
                "messages": [{ "role": "user", "content": user_prompt }],
            }))
            .context("count_tokens request failed")
            .and_then(|resp| {
                resp.into_json::<CountTokensResponse>()
                    .context("count_tokens response was not valid JSON")
            });

        match result {
            Ok(counted) => Some(counted.input_tokens),
            Err(e) => {
                log::debug!("hosted token count unavailable, estimating locally: {e:?}");
                None
            }
        }
    }
}
