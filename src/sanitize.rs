// sanitize.rs — body cleanup before a message is shown to a model or logged.
//
// URLs carry no promotional/personal signal and inflate prompt cost, so they
// collapse to a short placeholder. Long opaque word runs (tracking ids,
// base64 blobs, hashes) are dropped for the same reason.

use std::sync::LazyLock;

use regex::Regex;

use crate::config;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // $-_ is an ASCII range (0x24-0x5F): it pulls in the path/query
    // characters (/ : ; = ? and digits) so the whole URL collapses, not
    // just the host.
    Regex::new(r"https?://(?:[A-Za-z]|[0-9]|[$-_@.&+]|[!*(),]|%[0-9a-fA-F]{2})+").unwrap()
});

static LONG_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b\w{{{},}}\b", config::sanitize::LONG_TOKEN_MIN_CHARS)).unwrap()
});

/// Replace every URL with `DELETED_LINK`, then remove every word of 16+
/// characters. URL replacement runs first: the placeholder is 12 word
/// characters, so the long-token pass leaves it intact. Idempotent.
pub fn sanitize(text: &str) -> String {
    let cleaned = URL_RE.replace_all(text, config::sanitize::LINK_PLACEHOLDER);
    LONG_TOKEN_RE.replace_all(&cleaned, "").into_owned()
}
