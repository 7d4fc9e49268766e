//! Input normalization for card fields.
//!
//! Hashtags are stored bare and lowercase (`"#Rust"` is stored as `"rust"`).
//! Free-text hashtag input only accepts tokens carrying the `#` marker, so a
//! stray word in the field is dropped rather than turned into a tag. Lists that
//! arrive already split (JSON documents, imported rows) are cleaned the same way
//! except that the marker is optional.
//!
//! Gallery images are entered as a comma separated list of references.

const TAG_MARKER: char = '#';

/// Parses free-text hashtag input.
///
/// # Examples
/// ```
/// use deckz::normalize::parse_hashtags;
///
/// assert_eq!(parse_hashtags("#Foo bar #BAZ"), vec!["foo", "baz"]);
/// assert!(parse_hashtags("   ").is_empty());
/// ```
pub fn parse_hashtags(input: &str) -> Vec<String> {
    let marked = input
        .split_whitespace()
        .filter_map(|token| token.strip_prefix(TAG_MARKER));
    collect_tags(marked)
}

/// Cleans an already-split tag list: the marker is stripped when present.
pub fn clean_hashtags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let bare = tags.iter().map(|t| {
        let t = t.as_ref().trim();
        t.strip_prefix(TAG_MARKER).unwrap_or(t)
    });
    collect_tags(bare)
}

fn collect_tags<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || out.contains(&tag) {
            continue;
        }
        out.push(tag);
    }
    out
}

/// Renders tags back into the marked, space separated form used in forms and CSV.
pub fn format_hashtags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| format!("{}{}", TAG_MARKER, t.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a comma separated image list, trimming entries and dropping blanks.
pub fn parse_images(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trimmed value, or `None` when nothing is left.
pub fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
