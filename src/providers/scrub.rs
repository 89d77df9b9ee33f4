use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Key prefixes the configured providers hand out: Tavily (`tvly-`),
/// Groq (`gsk_`), generic OpenAI-style (`sk-`), and JWT-shaped tokens.
const PREFIX_PATTERNS: [&str; 4] = ["tvly-", "gsk_", "sk-", "eyJ"];

/// Header, query, and JSON markers a provider error body may echo back.
const MARKER_PATTERNS: [&str; 10] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "\"authorization\":\"Bearer ",
    "\"authorization\":\"bearer ",
    "api_key=",
    "access_token=",
    "\"api_key\":\"",
    "\"access_token\":\"",
    "\"token\":\"",
    "\"key\":\"",
];

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

/// Byte length of the secret-shaped run starting at byte offset `from`.
fn token_len(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .take_while(|&(_, c)| is_token_char(c))
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// Replace every `marker` occurrence, together with the token that follows
/// it, by the redaction placeholder. A bare marker with nothing after it is
/// left in place.
fn redact_after(text: &mut String, marker: &str) {
    let mut cursor = 0;
    while let Some(rel) = text[cursor..].find(marker) {
        let hit = cursor + rel;
        let value_start = hit + marker.len();
        let value_len = token_len(text, value_start);

        if value_len == 0 {
            cursor = value_start;
            continue;
        }

        text.replace_range(hit..value_start + value_len, REDACTED);
        cursor = hit + REDACTED.len();
    }
}

fn looks_clean(input: &str) -> bool {
    !PREFIX_PATTERNS
        .iter()
        .chain(&MARKER_PATTERNS)
        .any(|pattern| input.contains(pattern))
}

/// Scrub secret-shaped tokens from provider error text.
///
/// Search and model providers sometimes quote the failing request back in
/// their error bodies, credentials included. Everything surfaced to logs or
/// the user goes through here first.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if looks_clean(input) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for pattern in PREFIX_PATTERNS.iter().chain(&MARKER_PATTERNS) {
        redact_after(&mut scrubbed, pattern);
    }

    Cow::Owned(scrubbed)
}

/// Scrub and cap provider error text so an oversized body cannot flood the
/// status line or a gateway response.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    let cut = scrubbed.char_indices().nth(MAX_API_ERROR_CHARS);
    match cut {
        None => scrubbed.into_owned(),
        Some((at, _)) => format!("{}...", &scrubbed[..at]),
    }
}

/// Drain a failed HTTP response into `(status, sanitized body)`. Each client
/// wraps the pair in its own error variant so the status survives as data.
pub async fn api_failure(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable provider error body>".to_string());
    (status, sanitize_api_error(&body))
}
