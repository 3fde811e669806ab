//! NPC text segmentation

/// Literal marker separating displayed segments inside NPC text
pub const SEGMENT_BREAK: &str = "<br>";

/// Split raw NPC text into displayed segments.
///
/// Segments are split on [`SEGMENT_BREAK`], blank pieces are dropped and the
/// rest are trimmed.
#[must_use]
pub fn split_segments(text: &str) -> Vec<String> {
    text.split(SEGMENT_BREAK)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
