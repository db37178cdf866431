// router.rs — estimate input token cost, pick a backend.
//
// Typical-sized requests go to the hosted backend (better model, metered);
// anything estimated above the threshold goes local so an outsized thread
// never runs up the hosted bill. The estimate itself prefers the hosted
// provider's own counter and falls back to a local BPE approximation.

use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

use super::{Backend, BackendKind};
use crate::config;

static BPE: LazyLock<Option<CoreBPE>> = LazyLock::new(|| tiktoken_rs::cl100k_base().ok());

/// Pure threshold decision. Strictly above the cap routes local.
pub fn route(estimated_input_tokens: u32) -> BackendKind {
    if estimated_input_tokens > config::routing::MAX_INPUT_TOKENS {
        BackendKind::Local
    } else {
        BackendKind::Hosted
    }
}

/// Input token count for the combined prompt, hosted counter first.
pub fn estimate_input_tokens(hosted: &dyn Backend, system_prompt: &str, user_prompt: &str) -> u32 {
    if let Some(n) = hosted.count_input_tokens(system_prompt, user_prompt) {
        return n;
    }
    local_estimate(&format!("{system_prompt}\n{user_prompt}"))
}

/// BPE token count. The tokenizer family will not match the local model
/// exactly; an approximation is fine for a routing threshold.
pub fn local_estimate(text: &str) -> u32 {
    match BPE.as_ref() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len() as u32,
        None => (text.len() / config::routing::FALLBACK_BYTES_PER_TOKEN) as u32,
    }
}
