// local.rs — unmetered backend against a locally hosted chat endpoint
// (Ollama API shape). The provider reports no usable token usage, so the
// output count is estimated with the same BPE the router uses.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use super::{router, Backend, BackendKind, BackendReply};
use crate::config;

pub struct LocalBackend {
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

impl LocalBackend {
    pub fn new(base_url: &str, model: String) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), model }
    }
}

impl Backend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn classify(&self, system_prompt: &str, user_prompt: &str) -> anyhow::Result<BackendReply> {
        let resp: ChatResponse = ureq::post(&format!("{}/api/chat", self.base_url))
            .timeout(Duration::from_secs(config::http::REQUEST_TIMEOUT_SECS))
            .send_json(serde_json::json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": system_prompt },
                    { "role": "user", "content": user_prompt },
                ],
                "stream": false,
            }))
            .context("local classify request failed")?
            .into_json()
            .context("local classify response was not valid JSON")?;

        let output_tokens = router::local_estimate(&resp.message.content);
        Ok(BackendReply { text: resp.message.content, output_tokens })
    }
}
