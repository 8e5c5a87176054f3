/// Two transcript alternatives above this normalized-edit similarity are
/// considered the same utterance. The comparison is strict: a ratio of
/// exactly 0.92 does not collapse.
pub const SIMILARITY_THRESHOLD: f64 = 0.92;

pub fn is_similar(a: &str, b: &str) -> bool {
    strsim::normalized_levenshtein(a, b) > SIMILARITY_THRESHOLD
}

/// Collapse ranked transcript alternatives: keep the first, drop any later
/// alternative too similar to one already kept. Order is preserved.
pub fn dedup_alternatives<I, S>(alternatives: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut kept: Vec<String> = Vec::new();
    for alt in alternatives {
        let alt = alt.as_ref().trim();
        if alt.is_empty() {
            continue;
        }
        if !kept.iter().any(|k| is_similar(alt, k)) {
            kept.push(alt.to_string());
        }
    }
    kept
}
