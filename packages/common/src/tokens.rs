//! # Design Tokens
//!
//! Shared style variables applied to every block unless a block overrides
//! them. Every field carries a serde default so partial payloads (and the
//! untrusted payloads the published viewer receives) still deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignTokens {
    pub background: Background,
    pub gradient: Gradient,
    pub typography: Typography,
    pub card: CardStyle,
    pub link_colors: ColorTriad,
    pub cta_colors: ColorTriad,
}

/// How a background image fills the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundFit {
    #[default]
    Cover,
    Contain,
    Fill,
    Repeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Background {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub fit: BackgroundFit,
    /// Scrim strength, 0-100
    pub overlay: u8,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            image: None,
            fit: BackgroundFit::Cover,
            overlay: 0,
        }
    }
}

impl Background {
    /// Image URL when one is set and non-blank
    pub fn image_url(&self) -> Option<&str> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    None,
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Gradient {
    pub kind: GradientKind,
    /// Degrees, only used by linear gradients
    pub angle: u16,
    pub start: String,
    pub end: String,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            kind: GradientKind::None,
            angle: 180,
            start: "#ffffff".to_string(),
            end: "#f1f5f9".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Typography {
    pub heading_font: String,
    pub body_font: String,
    pub label_font: String,
    pub heading_size: f64,
    pub body_size: f64,
    pub label_size: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            heading_font: "Inter".to_string(),
            body_font: "Inter".to_string(),
            label_font: "Inter".to_string(),
            heading_size: 28.0,
            body_size: 16.0,
            label_size: 13.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadiusBucket {
    None,
    Small,
    Medium,
    Large,
    Pill,
}

impl RadiusBucket {
    pub fn pixels(self) -> f64 {
        match self {
            RadiusBucket::None => 0.0,
            RadiusBucket::Small => 4.0,
            RadiusBucket::Medium => 8.0,
            RadiusBucket::Large => 16.0,
            RadiusBucket::Pill => 9999.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationBucket {
    None,
    Low,
    Medium,
    High,
}

impl ElevationBucket {
    pub fn shadow(self) -> &'static str {
        match self {
            ElevationBucket::None => "none",
            ElevationBucket::Low => "0 1px 3px rgba(0, 0, 0, 0.12)",
            ElevationBucket::Medium => "0 4px 12px rgba(0, 0, 0, 0.15)",
            ElevationBucket::High => "0 12px 32px rgba(0, 0, 0, 0.2)",
        }
    }
}

/// Card styling shared by all blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardStyle {
    pub radius: Option<RadiusBucket>,
    pub elevation: Option<ElevationBucket>,
    pub surface_color: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            radius: Some(RadiusBucket::Medium),
            elevation: Some(ElevationBucket::Low),
            surface_color: "#ffffff".to_string(),
        }
    }
}

/// Default / hover / active colors for links and calls to action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorTriad {
    pub default: String,
    pub hover: String,
    pub active: String,
}

impl Default for ColorTriad {
    fn default() -> Self {
        Self {
            default: "#2563eb".to_string(),
            hover: "#1d4ed8".to_string(),
            active: "#1e40af".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_tokens_deserialize_with_defaults() {
        let tokens: DesignTokens =
            serde_json::from_str(r##"{"background": {"color": "#000000"}}"##).unwrap();

        assert_eq!(tokens.background.color, "#000000");
        assert_eq!(tokens.background.overlay, 0);
        assert_eq!(tokens.typography, Typography::default());
        assert_eq!(tokens.card.radius, Some(RadiusBucket::Medium));
    }

    #[test]
    fn test_blank_image_is_no_image() {
        let background = Background {
            image: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(background.image_url(), None);
    }
}
