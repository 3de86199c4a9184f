use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A\s*```[A-Za-z0-9_+-]*\s*").expect("LEADING_FENCE is a valid regex pattern")
});

static TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*```\s*\z").expect("TRAILING_FENCE is a valid regex pattern")
});

/// Removes a leading fence line (with an optional language tag) and a trailing fence. Each is
/// stripped on its own, so a reply missing one of them still parses. Text without a fence is
/// returned unchanged.
pub fn strip_code_fence(raw: &str) -> &str {
    let start = LEADING_FENCE.find(raw).map_or(0, |m| m.end());
    let rest = &raw[start..];
    let end = TRAILING_FENCE.find(rest).map_or(rest.len(), |m| m.start());
    &rest[..end]
}
