//! Input normalization for untrusted form values.
//!
//! # Responsibility
//! - Reduce single-line fields to plain text.
//! - Keep a small allow-list of formatting tags in message bodies.
//! - Decide syntactic email validity.
//!
//! # Invariants
//! - Sanitizers never HTML-escape; output is stored as-is and escaped by the
//!   renderer.
//! - Sanitizers are idempotent: applying one twice equals applying it once.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static ANY_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)</?[a-zA-Z!][^>]*>").expect("valid tag regex"));
static MESSAGE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<(/?)([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").expect("valid message tag regex")
});
static HREF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid href regex")
});
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static EMAIL_LOCAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~.-]+$").expect("valid email local regex")
});
static EMAIL_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("valid email label regex"));

/// Tags kept in message bodies. Everything else is dropped, content kept.
const MESSAGE_ALLOWED_TAGS: &[&str] = &[
    "a",
    "b",
    "blockquote",
    "br",
    "code",
    "em",
    "i",
    "li",
    "ol",
    "p",
    "pre",
    "strong",
    "u",
    "ul",
];
const HREF_ALLOWED_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];
const EMAIL_MIN_LEN: usize = 6;
const EMAIL_EXTRA_CHARS: &str = "!#$%&'*+/=?^_`{|}~.-@";

/// Normalizes one single-line text field.
///
/// Strips all markup, turns line breaks and tabs into spaces, collapses runs of
/// whitespace and trims both ends.
pub fn sanitize_text_field(value: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(value, " ");
    let without_tags = ANY_TAG_RE.replace_all(&without_comments, " ");
    WHITESPACE_RE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Normalizes an email field by trimming and removing disallowed characters.
pub fn sanitize_email(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || EMAIL_EXTRA_CHARS.contains(*ch))
        .collect()
}

/// Normalizes a message body, keeping only allow-listed formatting tags.
///
/// Allowed tags lose every attribute except `href` on `<a>`, which survives only
/// for `http`, `https` and `mailto` targets. Line breaks are preserved.
pub fn sanitize_message(value: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(value, "");
    let filtered = MESSAGE_TAG_RE.replace_all(&without_comments, |caps: &Captures<'_>| {
        rebuild_allowed_tag(caps).unwrap_or_default()
    });
    filtered.trim().to_string()
}

/// Returns whether `value` is a syntactically valid email address.
///
/// Rules: minimum length, exactly one `@` with a non-empty local part made of
/// atext characters, and a dotted domain of at least two labels where each
/// label is alphanumeric/hyphen and neither starts nor ends with a hyphen.
pub fn is_valid_email(value: &str) -> bool {
    if value.len() < EMAIL_MIN_LEN {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || !EMAIL_LOCAL_RE.is_match(local) {
        return false;
    }

    if domain.contains("..") || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    let labels = domain.split('.').collect::<Vec<_>>();
    if labels.len() < 2 {
        return false;
    }

    labels.iter().all(|label| {
        !label.starts_with('-') && !label.ends_with('-') && EMAIL_LABEL_RE.is_match(label)
    })
}

fn rebuild_allowed_tag(caps: &Captures<'_>) -> Option<String> {
    let closing = !caps[1].is_empty();
    let name = caps[2].to_ascii_lowercase();
    if !MESSAGE_ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }

    if closing {
        return Some(format!("</{name}>"));
    }

    if name == "a" {
        return Some(match allowed_href(&caps[3]) {
            Some(href) => format!("<a href=\"{}\">", href.replace('"', "%22")),
            None => "<a>".to_string(),
        });
    }

    Some(format!("<{name}>"))
}

fn allowed_href(attributes: &str) -> Option<String> {
    let caps = HREF_RE.captures(attributes)?;
    let raw = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str()
        .trim();
    let lowered = raw.to_ascii_lowercase();
    HREF_ALLOWED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
        .then(|| raw.to_string())
}
