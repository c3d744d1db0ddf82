//! # Link Metadata
//!
//! Slug, campaign fields and the optional QR association of a page.
//! `slug` here is the single authority for the page address; the copy kept
//! in page settings is a mirror written at save time.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkMetadata {
    pub slug: String,
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub utm: UtmParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr: Option<QrAssociation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UtmParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UtmParams {
    /// `utm_*` query pairs for the set fields, in a fixed order
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("utm_source", &self.source),
            ("utm_medium", &self.medium),
            ("utm_campaign", &self.campaign),
            ("utm_term", &self.term),
            ("utm_content", &self.content),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

/// QR error-correction level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

/// Render customization handed to the QR asset service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QrCustomization {
    pub foreground: String,
    pub background: String,
    pub size: u32,
    pub margin: u32,
    pub error_correction: ErrorCorrection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Default for QrCustomization {
    fn default() -> Self {
        Self {
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
            size: 512,
            margin: 4,
            error_correction: ErrorCorrection::M,
            logo: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrImageFormat {
    Png,
    Svg,
}

/// Image blob produced by the QR asset service, never modified here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrImage {
    pub format: QrImageFormat,
    pub bytes: Arc<[u8]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrAssociation {
    /// Address encoded in the QR code
    pub destination: String,
    /// Dynamic codes encode a short link whose target can change later
    #[serde(default)]
    pub is_dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    #[serde(default)]
    pub customization: QrCustomization,
    #[serde(default)]
    pub images: Vec<QrImage>,
}
