//! # Pagesmith Common
//!
//! Shared data model for the page studio: content blocks, design tokens,
//! link metadata, the page document and the history snapshot, plus the
//! slug and page-name rules used by validation and publishing.

pub mod block;
pub mod document;
pub mod error;
pub mod ids;
pub mod link;
pub mod rules;
pub mod tokens;

pub use block::{BlockStyle, BlockType, ContentBlock, Props, TextAlign};
pub use document::{
    HistorySnapshot, PageDocument, PageId, PageKind, PageSettings, PageStatus, PublishInfo,
};
pub use error::*;
pub use ids::{get_document_seed, BlockId, BlockIdGenerator};
pub use link::{
    ErrorCorrection, LinkMetadata, QrAssociation, QrCustomization, QrImage, QrImageFormat,
    UtmParams,
};
pub use rules::{
    check_name_format, check_slug_format, normalize_name, normalize_slug, sanitize_slug,
    NAME_MAX_LEN, SLUG_MAX_LEN, SLUG_MIN_LEN,
};
pub use tokens::{
    Background, BackgroundFit, CardStyle, ColorTriad, DesignTokens, ElevationBucket, Gradient,
    GradientKind, RadiusBucket, Typography,
};
