//! Chunked tail truncation

/// Suffix appended to content that was cut short
pub const TRUNCATION_MARKER: &str = "…";

/// Cut `text` from the end, `chunk_chars` characters at a time, until
/// `fits(candidate)` accepts the remainder with [`TRUNCATION_MARKER`] appended.
///
/// Returns `None` when nothing but the marker would remain.
pub fn truncate_in_chunks<F>(text: &str, chunk_chars: usize, fits: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let chunk = chunk_chars.max(1);
    let mut len = text.chars().count();

    while len > 0 {
        let mut candidate = char_prefix(text, len).to_string();
        candidate.push_str(TRUNCATION_MARKER);
        if fits(&candidate) {
            return Some(candidate);
        }
        len = len.saturating_sub(chunk);
    }

    None
}

fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
