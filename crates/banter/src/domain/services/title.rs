//! Conversation titles
//!
//! Titles are generated by the completion provider and cleaned up here
//! before they are stored.

/// Longest title stored, in characters
pub const MAX_TITLE_CHARS: usize = 100;

/// Title used when neither the model nor the message yields anything
pub const DEFAULT_TITLE: &str = "New conversation";

/// System instruction sent with the first user message to obtain a title
pub const TITLE_INSTRUCTION: &str = "Generate a short, concise title (5-10 words) for this conversation based on the following message. Respond with only the title, no additional text or punctuation.";

const WRAPPING: &[char] = &['"', '\'', '`', '*', '#', '“', '”', '‘', '’'];
const TRAILING: &[char] = &['.', '!', '?', ':', ';', ','];

/// Clean up a raw title
///
/// Collapses whitespace, drops a leading `Title:` label, strips wrapping
/// quotes/markdown and trailing punctuation, and caps the length.
/// Returns `None` when nothing is left.
pub fn normalize_title(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let unlabeled = match collapsed.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("title:") => &collapsed[6..],
        _ => collapsed.as_str(),
    };

    let cleaned = unlabeled
        .trim()
        .trim_matches(WRAPPING)
        .trim()
        .trim_end_matches(TRAILING)
        .trim_matches(WRAPPING)
        .trim();

    if cleaned.is_empty() {
        return None;
    }

    let capped: String = cleaned.chars().take(MAX_TITLE_CHARS).collect();
    Some(capped.trim_end().to_string())
}

/// Title derived from the message itself (first non-empty line)
pub fn fallback_title(content: &str) -> String {
    content
        .lines()
        .find_map(normalize_title)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}
