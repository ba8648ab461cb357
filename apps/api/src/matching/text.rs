use once_cell::sync::Lazy;
use regex::Regex;

static RE_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalized text longer than this is truncated before embedding.
/// Embedding cost is O(384 × len), so unbounded input means unbounded latency.
pub const MAX_EMBED_CHARS: usize = 4096;

/// Strips markup-tag-like substrings (`<...>`), collapses whitespace runs
/// into a single space, and trims. Case is preserved; display text goes
/// through this, embedding text additionally gets lower-cased and capped.
pub fn normalize(text: &str) -> String {
    let stripped = RE_MARKUP.replace_all(text, "");
    let collapsed = RE_WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Normalization applied before embedding generation: lower-cased and
/// truncated to `MAX_EMBED_CHARS` characters.
pub fn normalize_for_embedding(text: &str) -> String {
    let normalized = normalize(text).to_lowercase();
    if normalized.chars().count() > MAX_EMBED_CHARS {
        normalized.chars().take(MAX_EMBED_CHARS).collect()
    } else {
        normalized
    }
}
