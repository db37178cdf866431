// classify/mod.rs — the classification pipeline.
//
// One polymorphic Backend trait with two implementations (hosted, local);
// the router decides which one answers based on estimated input tokens.
// Extraction failure is a first-class outcome: the verdict is a tri-state
// and only an explicit Promotional ever leads to a trash call.

pub mod extract;
pub mod hosted;
pub mod local;
pub mod router;

use std::fmt;

use crate::audit::AuditLog;
use crate::config;
use crate::message::ParsedMessage;
use crate::prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Hosted,
    Local,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Hosted => write!(f, "hosted"),
            BackendKind::Local => write!(f, "local"),
        }
    }
}

/// Final decision for one message. `Inconclusive` covers backend failures
/// and missing/malformed answer tags; the sweep treats it like `Personal`
/// (deleting real mail is expensive, keeping a promo is cheap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Promotional,
    Personal,
    Inconclusive,
}

impl Verdict {
    pub fn should_trash(self) -> bool {
        self == Verdict::Promotional
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Promotional => "promotional",
            Verdict::Personal => "personal",
            Verdict::Inconclusive => "inconclusive",
        }
    }
}

/// Raw model output plus the provider-reported (hosted) or locally
/// estimated (local) output token count.
#[derive(Debug)]
pub struct BackendReply {
    pub text: String,
    pub output_tokens: u32,
}

/// "Send prompt, get free-form text back." Both backends look identical
/// from the router's point of view.
pub trait Backend {
    fn kind(&self) -> BackendKind;

    fn classify(&self, system_prompt: &str, user_prompt: &str) -> anyhow::Result<BackendReply>;

    /// Provider-side input token count, if this backend can measure one.
    /// The router falls back to a local estimate when this returns None.
    fn count_input_tokens(&self, _system_prompt: &str, _user_prompt: &str) -> Option<u32> {
        None
    }
}

/// Everything the audit log records about one decision. Built per message,
/// written out, dropped.
#[derive(Debug)]
pub struct ClassificationResult {
    pub verdict: Verdict,
    pub backend: BackendKind,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub raw_text: String,
}

pub struct Classifier {
    system_prompt: String,
    hosted: Box<dyn Backend>,
    local: Box<dyn Backend>,
    audit: AuditLog,
}

impl Classifier {
    pub fn new(
        system_prompt: String,
        hosted: Box<dyn Backend>,
        local: Box<dyn Backend>,
        audit: AuditLog,
    ) -> Self {
        Self { system_prompt, hosted, local, audit }
    }

    /// Classify one parsed message. Never fails: backend and extraction
    /// problems surface as `Inconclusive`, and every decision (including
    /// the inconclusive ones) lands in the audit log.
    pub fn assess(&self, msg: &ParsedMessage) -> Verdict {
        let user_prompt = prompt::user_prompt(msg, config::prompt::MAX_EMAIL_LEN);
        let input_tokens =
            router::estimate_input_tokens(self.hosted.as_ref(), &self.system_prompt, &user_prompt);
        let backend = match router::route(input_tokens) {
            BackendKind::Hosted => self.hosted.as_ref(),
            BackendKind::Local => self.local.as_ref(),
        };

        let result = match backend.classify(&self.system_prompt, &user_prompt) {
            Ok(reply) => ClassificationResult {
                verdict: extract::extract_verdict(&reply.text),
                backend: backend.kind(),
                input_tokens,
                output_tokens: reply.output_tokens,
                raw_text: reply.text,
            },
            Err(e) => {
                log::warn!("{} backend failed, leaving message alone: {e:?}", backend.kind());
                ClassificationResult {
                    verdict: Verdict::Inconclusive,
                    backend: backend.kind(),
                    input_tokens,
                    output_tokens: 0,
                    raw_text: String::new(),
                }
            }
        };

        self.audit.record(msg, &result);
        result.verdict
    }
}
