//! Output file naming.
//!
//! The names are part of the output contract and must not change:
//! `conversation-{reverse}-{title}.html` and
//! `conversation-{reverse}-{title}-image-{n}{ext}`.

const OUTPUT_PREFIX: &str = "conversation";
const SNAPSHOT_EXTENSION: &str = ".html";
const MAX_EXTENSION_LEN: usize = 5;

/// Title used when an item exposes neither a title attribute nor fallback text.
pub const UNTITLED: &str = "Untitled";

/// Extension used when an image locator has no plausible suffix.
pub const FALLBACK_EXTENSION: &str = ".jpg";

/// Replaces characters that are illegal in common filesystems with `_` and trims
/// surrounding whitespace.
pub fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Picks the display title: primary attribute, then fallback text, then [`UNTITLED`].
///
/// Blank candidates are skipped.
pub fn display_title(primary: Option<&str>, fallback: Option<&str>) -> String {
    [primary, fallback]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(UNTITLED)
        .to_string()
}

/// Derives a file extension (with leading dot) from an image source locator.
///
/// Takes the suffix from the last `.`; anything longer than five characters or
/// containing non-alphanumerics (query strings, path segments) falls back to
/// [`FALLBACK_EXTENSION`].
pub fn image_extension(src: &str) -> String {
    match src.rfind('.') {
        Some(idx) => {
            let suffix = &src[idx..];
            let plausible = suffix.len() > 1
                && suffix.len() <= MAX_EXTENSION_LEN
                && suffix[1..].chars().all(|c| c.is_ascii_alphanumeric());
            if plausible {
                suffix.to_string()
            } else {
                FALLBACK_EXTENSION.to_string()
            }
        }
        None => FALLBACK_EXTENSION.to_string(),
    }
}

/// Names of every file produced for one visited item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    stem: String,
}

impl OutputNames {
    /// `title` is sanitized here; pass the raw display title.
    pub fn new(reverse_index: usize, title: &str) -> Self {
        let safe = sanitize_filename(title);
        Self {
            stem: format!("{OUTPUT_PREFIX}-{reverse_index}-{safe}"),
        }
    }

    pub fn snapshot(&self) -> String {
        format!("{}{SNAPSHOT_EXTENSION}", self.stem)
    }

    /// `asset_index` is 1-based per item; `extension` includes the leading dot.
    pub fn asset(&self, asset_index: usize, extension: &str) -> String {
        format!("{}-image-{asset_index}{extension}", self.stem)
    }
}
