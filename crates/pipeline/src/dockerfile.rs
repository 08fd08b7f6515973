//! `FROM` instruction extraction.
//!
//! Line oriented and best effort: this is not a Dockerfile grammar. Line
//! continuations, parser directives, `ARG` substitution and heredocs are not
//! interpreted. A line counts when, after leading whitespace, it starts with
//! `FROM` (any case) followed by whitespace and an argument.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::{AliasSplit, ImageReference};

// Whitespace is the ASCII set only, matching the manifest line pattern.
static FROM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\t\n\x0C\r ]*FROM[\t\n\x0C\r ]+([^\t\n\x0C\r ]+)")
        .expect("FROM pattern is valid")
});

const LEGACY_ALIAS_SEPARATOR: &str = "AS";

/// Extracts the base-image references declared by a Dockerfile, in file order.
pub fn extract_images(content: &str, split: AliasSplit) -> Vec<ImageReference> {
    content
        .lines()
        .filter_map(|line| FROM_PATTERN.captures(line))
        .map(|captures| strip_alias(&captures[1], split))
        .collect()
}

/// Reads a Dockerfile from disk and extracts its references.
///
/// Invalid UTF-8 is replaced rather than rejected; only I/O failures (missing
/// file, dangling symlink, permissions) are errors.
pub fn read_images(path: &Path, split: AliasSplit) -> std::io::Result<Vec<ImageReference>> {
    let bytes = std::fs::read(path)?;
    Ok(extract_images(&String::from_utf8_lossy(&bytes), split))
}

fn strip_alias(candidate: &str, split: AliasSplit) -> ImageReference {
    match split {
        AliasSplit::Token => ImageReference::from_raw(candidate),
        AliasSplit::LegacySubstring => {
            let image = candidate
                .split(LEGACY_ALIAS_SEPARATOR)
                .next()
                .unwrap_or_default();
            ImageReference::from_raw(image.trim())
        }
    }
}
