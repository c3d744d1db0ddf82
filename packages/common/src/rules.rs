//! Slug and page-name normalization and format rules.
//!
//! Slugs match `[a-z0-9]+(-[a-z0-9]+)*` and are 5-32 characters long.

use crate::error::{NameFormatError, SlugFormatError};

pub const SLUG_MIN_LEN: usize = 5;
pub const SLUG_MAX_LEN: usize = 32;
pub const NAME_MAX_LEN: usize = 100;

/// Lowercase, turn whitespace into hyphens, drop anything outside
/// `[a-z0-9-]` and collapse hyphen runs. Leading and trailing hyphens are
/// kept so the format check can report them.
pub fn sanitize_slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars().flat_map(char::to_lowercase) {
        let ch = if ch.is_whitespace() { '-' } else { ch };
        match ch {
            'a'..='z' | '0'..='9' => out.push(ch),
            '-' if !out.ends_with('-') => out.push('-'),
            _ => {}
        }
    }
    out
}

/// [`sanitize_slug`] followed by trimming hyphens from both ends
pub fn normalize_slug(raw: &str) -> String {
    sanitize_slug(raw).trim_matches('-').to_string()
}

pub fn check_slug_format(slug: &str) -> Result<(), SlugFormatError> {
    if slug.is_empty() {
        return Err(SlugFormatError::Empty);
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SlugFormatError::InvalidCharacters);
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(SlugFormatError::LeadingOrTrailingHyphen);
    }
    if slug.contains("--") {
        return Err(SlugFormatError::ConsecutiveHyphens);
    }

    let len = slug.len();
    if len < SLUG_MIN_LEN {
        return Err(SlugFormatError::TooShort {
            min: SLUG_MIN_LEN,
            len,
        });
    }
    if len > SLUG_MAX_LEN {
        return Err(SlugFormatError::TooLong {
            max: SLUG_MAX_LEN,
            len,
        });
    }

    Ok(())
}

/// Trim and collapse internal whitespace
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn check_name_format(name: &str) -> Result<(), NameFormatError> {
    let len = name.chars().count();
    if len == 0 {
        return Err(NameFormatError::Empty);
    }
    if len > NAME_MAX_LEN {
        return Err(NameFormatError::TooLong {
            max: NAME_MAX_LEN,
            len,
        });
    }
    Ok(())
}
