/// Maximum words per translation chunk. Third-party providers silently
/// truncate or reject long inputs, so text is translated in bounded
/// word groups and re-joined afterwards.
pub const MAX_CHUNK_WORDS: usize = 25;

/// Split `text` into whitespace-delimited word groups of at most
/// [`MAX_CHUNK_WORDS`] words, preserving order. Boundaries never fall
/// inside a word. Empty or whitespace-only input yields no chunks.
pub fn split_text(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(MAX_CHUNK_WORDS)
        .map(|group| group.join(" "))
        .collect()
}
