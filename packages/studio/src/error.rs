//! Error types for the studio

use pagesmith_common::{NameFormatError, PageId, SlugFormatError};
use pagesmith_editor::PersistError;
use thiserror::Error;

/// Failure talking to the page store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Page store unavailable: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Page not found: {0}")]
    NotFound(PageId),
}

/// Failure from the QR asset service or the link shortener
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Why a publish or draft save may not proceed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuardViolation {
    #[error("{0}")]
    InvalidPageName(NameFormatError),

    #[error("Product pages need a product")]
    MissingProduct,

    #[error("Page name has not been confirmed as available")]
    NameNotAvailable,

    #[error("A landing page with this name already exists")]
    NameTaken,

    #[error("{0}")]
    InvalidSlug(SlugFormatError),

    #[error("Slug has not been confirmed as available")]
    SlugNotAvailable,

    #[error("This slug is already in use")]
    SlugTaken,

    #[error("Add at least one block before publishing")]
    EmptyCanvas,

    #[error("This page is live; republish it to save changes")]
    PageIsLive,
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Publish blocked: {}", describe(.0))]
    Blocked(Vec<GuardViolation>),

    #[error("A publish or save is already in progress")]
    InFlight,

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn describe(violations: &[GuardViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl PublishError {
    pub fn violations(&self) -> &[GuardViolation] {
        match self {
            PublishError::Blocked(violations) => violations,
            _ => &[],
        }
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No published page for code {0:?}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StudioError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Page has not been saved yet")]
    Unsaved,
}
