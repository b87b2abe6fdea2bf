/// Longest response body kept in an error message, in characters.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}
