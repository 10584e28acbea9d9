//! Best-effort contact address extraction from a profile's embedded script.
//!
//! The script text is JSON-ish and full of escape sequences (`\n`, `\u2022`).
//! Addresses are matched with a loose pattern that tolerates one leading
//! escape character, then each candidate is cleaned of escape artifacts.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static ESCAPE_AFTER_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w)\\").expect("valid regex"));

static EMAIL_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w\\][\w._%+-]+@[\w.-]+\.[a-zA-Z]{2,4}").expect("valid regex")
});

/// Number of characters following `\u` that make up an escaped-unicode artifact.
const UNICODE_ARTIFACT_LEN: usize = 5;

/// Extract the distinct addresses found in `script_text`, joined by commas in
/// first-seen order. Returns an empty string when nothing survives cleanup.
#[must_use]
pub fn extract_emails(script_text: &str) -> String {
    let separated = separate_escapes(script_text);

    let mut seen = HashSet::new();
    let mut emails: Vec<String> = Vec::new();
    for candidate in EMAIL_CANDIDATE.find_iter(&separated) {
        if let Some(email) = clean_candidate(candidate.as_str()) {
            if seen.insert(email.clone()) {
                emails.push(email);
            }
        }
    }

    emails.join(",")
}

/// Insert a space between a word character and a backslash that follows it,
/// so `abc\njohn@x.com` cannot match across the escape boundary.
fn separate_escapes(text: &str) -> String {
    ESCAPE_AFTER_WORD.replace_all(text, "${1} \\").into_owned()
}

/// Strip escape artifacts from one pattern match.
///
/// Returns `None` for mentions (`@user...`) and for matches whose artifact
/// strip consumed the `@`.
pub(crate) fn clean_candidate(raw: &str) -> Option<String> {
    let stripped = if let Some(rest) = raw.strip_prefix("\\u") {
        skip_chars(rest, UNICODE_ARTIFACT_LEN)
    } else if let Some(rest) = raw.strip_prefix('\\') {
        skip_chars(rest, 1)
    } else {
        raw
    };

    let stripped = stripped.strip_prefix('-').unwrap_or(stripped);

    if stripped.starts_with('@') || !stripped.contains('@') {
        return None;
    }
    Some(stripped.to_string())
}

fn skip_chars(s: &str, count: usize) -> &str {
    match s.char_indices().nth(count) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}
