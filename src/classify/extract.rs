// extract.rs — pull the tagged boolean out of free-form model text.

use std::sync::LazyLock;

use regex::Regex;

use super::Verdict;

static ANSWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<answer>\s*(True|False)\s*</answer>").unwrap());

/// First well-formed `<answer>` tag wins. No tag, or anything other than a
/// literal `True`/`False` inside it, is `Inconclusive` — the caller maps
/// that to the do-not-delete side.
pub fn extract_verdict(raw_text: &str) -> Verdict {
    match ANSWER_RE.captures(raw_text).map(|c| c[1].to_string()) {
        Some(answer) if answer == "True" => Verdict::Promotional,
        Some(_) => Verdict::Personal,
        None => Verdict::Inconclusive,
    }
}
