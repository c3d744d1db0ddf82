use thiserror::Error;

/// Reasons a slug candidate fails the synchronous format check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugFormatError {
    #[error("Slug is required")]
    Empty,

    #[error("Slug must be at least {min} characters (got {len})")]
    TooShort { min: usize, len: usize },

    #[error("Slug must be at most {max} characters (got {len})")]
    TooLong { max: usize, len: usize },

    #[error("Slug may only contain lowercase letters, digits and hyphens")]
    InvalidCharacters,

    #[error("Slug cannot start or end with a hyphen")]
    LeadingOrTrailingHyphen,

    #[error("Slug cannot contain consecutive hyphens")]
    ConsecutiveHyphens,
}

/// Reasons a page name fails the synchronous format check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameFormatError {
    #[error("Page name is required")]
    Empty,

    #[error("Page name must be at most {max} characters (got {len})")]
    TooLong { max: usize, len: usize },
}
