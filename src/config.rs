// IMPORTANT:
// Keep ALL numeric values centralized here (repo rule: no hardcoded numeric values scattered around).

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

// NOTE: APP_VERSION must stay in sync with the `version` field in Cargo.toml.
pub const APP_VERSION: &str = "0.3.0";

pub mod logging {
    pub const LOG_DIR_REL: &str = ".mailsweep/logs";
    pub const LOG_FILE_NAME: &str = "mailsweep.log";

    pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const LOG_ROTATE_KEEP_FILES: usize = 5;
}

pub mod http {
    // A hung provider would otherwise stall the whole sweep.
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

pub mod sanitize {
    // Must stay under LONG_TOKEN_MIN_CHARS word characters so the second
    // sanitizer pass leaves it alone.
    pub const LINK_PLACEHOLDER: &str = "DELETED_LINK";

    pub const LONG_TOKEN_MIN_CHARS: usize = 16;
}

pub mod prompt {
    // Body truncation bound, in characters. Token estimation and backend
    // request size are only meaningful because the body is pre-bounded.
    pub const MAX_EMAIL_LEN: usize = 3000;

    pub const TRUNCATION_MARKER: &str = "...";
}

pub mod routing {
    // Requests estimated above this many input tokens go to the local
    // backend instead of the metered hosted one.
    pub const MAX_INPUT_TOKENS: u32 = 8192;

    // Crude bytes-per-token ratio, used only if the BPE tables fail to load.
    pub const FALLBACK_BYTES_PER_TOKEN: usize = 4;
}

pub mod hosted {
    pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
    pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
    pub const API_VERSION: &str = "2023-06-01";

    pub const MAX_OUTPUT_TOKENS: u32 = 1024;
}

pub mod local {
    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
    pub const DEFAULT_MODEL: &str = "llama3.1:8b";
}

pub mod gmail {
    pub const API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";
    pub const UNREAD_LABEL: &str = "UNREAD";
}

pub mod audit {
    pub const AUDIT_DIR_REL: &str = ".mailsweep/audit";

    // One log file per calendar day.
    pub const FILE_DATE_FORMAT: &str = "%d.%m.%Y";
    pub const FILE_SUFFIX: &str = "_responses.log";
}

pub mod env {
    pub const HOSTED_API_KEY: &str = "MAILSWEEP_API_KEY";
    pub const HOSTED_BASE_URL: &str = "MAILSWEEP_HOSTED_BASE_URL";
    pub const HOSTED_MODEL: &str = "MAILSWEEP_HOSTED_MODEL";
    pub const LOCAL_BASE_URL: &str = "MAILSWEEP_LOCAL_BASE_URL";
    pub const LOCAL_MODEL: &str = "MAILSWEEP_LOCAL_MODEL";
    pub const GMAIL_TOKEN: &str = "MAILSWEEP_GMAIL_TOKEN";
}

/// Who the inbox belongs to. Loaded once from `config.json` at startup and
/// immutable for the lifetime of the process; edits take effect on restart.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub user_first_name: String,
    pub user_last_name: String,
    /// Interests that make even promotional-looking mail worth keeping.
    #[serde(default)]
    pub hobbies: Vec<String>,
    /// Senders/topics that must never be classified promotional.
    #[serde(default)]
    pub not_delete: Vec<String>,
}

impl Profile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading profile {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing profile {}", path.display()))
    }
}
