//! # Style Resolver
//!
//! Maps design tokens plus a block's overrides to the concrete style of one
//! block. Precedence, highest first:
//!
//! 1. a set, non-zero block override
//! 2. the token-derived default for that property
//! 3. a hard-coded fallback
//!
//! The authoring canvas and the published viewer both go through
//! [`resolve_style_for`]; nothing else produces block styles.

use crate::html::sanitize_css_value;
use crate::registry;
use pagesmith_common::{BlockStyle, ContentBlock, DesignTokens};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{instrument, trace};

pub const FALLBACK_MARGIN: &str = "0 0 16px 0";
pub const FALLBACK_PADDING_PX: f64 = 16.0;
pub const FALLBACK_SURFACE_COLOR: &str = "#ffffff";
pub const FALLBACK_RADIUS_PX: f64 = 8.0;
pub const FALLBACK_SHADOW: &str = "none";
pub const FALLBACK_FONT_STACK: &str = "system-ui, sans-serif";
pub const FALLBACK_FONT_SIZE_PX: f64 = 16.0;
pub const FALLBACK_TEXT_ALIGN: &str = "left";
pub const FALLBACK_WIDTH: &str = "100%";
pub const FALLBACK_HEIGHT: &str = "auto";
pub const FALLBACK_OPACITY: &str = "1";

/// Concrete CSS declaration for one element, ordered by property name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDeclaration {
    pub properties: BTreeMap<String, String>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        self.properties.insert(property.to_string(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.properties.remove(property)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn to_inline_css(&self) -> String {
        crate::vdom::inline_css(&self.properties)
    }
}

pub(crate) fn px(value: f64) -> String {
    format!("{}px", value)
}

/// Positive finite override value
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn non_blank(value: &str) -> Option<String> {
    let cleaned = sanitize_css_value(value);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// `"<font>", system-ui, sans-serif`, or just the fallback stack
pub fn font_stack(family: &str) -> String {
    match non_blank(family) {
        Some(family) => format!("{}, {}", family, FALLBACK_FONT_STACK),
        None => FALLBACK_FONT_STACK.to_string(),
    }
}

/// Size in px, falling back when the token is unset or nonsensical
pub fn font_size(size: f64) -> String {
    px(positive(Some(size)).unwrap_or(FALLBACK_FONT_SIZE_PX))
}

/// Layers 2 and 3: token-derived defaults over hard-coded fallbacks
pub fn base_declaration(tokens: &DesignTokens) -> StyleDeclaration {
    let mut decl = StyleDeclaration::new();

    decl.set("margin", FALLBACK_MARGIN);
    decl.set("padding", px(FALLBACK_PADDING_PX));
    decl.set(
        "background-color",
        non_blank(&tokens.card.surface_color)
            .unwrap_or_else(|| FALLBACK_SURFACE_COLOR.to_string()),
    );
    decl.set(
        "border-radius",
        px(tokens
            .card
            .radius
            .map(|bucket| bucket.pixels())
            .unwrap_or(FALLBACK_RADIUS_PX)),
    );
    decl.set(
        "box-shadow",
        tokens
            .card
            .elevation
            .map(|bucket| bucket.shadow())
            .unwrap_or(FALLBACK_SHADOW),
    );
    decl.set("font-family", font_stack(&tokens.typography.body_font));
    decl.set("font-size", font_size(tokens.typography.body_size));
    decl.set("text-align", FALLBACK_TEXT_ALIGN);
    decl.set("width", FALLBACK_WIDTH);
    decl.set("height", FALLBACK_HEIGHT);
    decl.set("opacity", FALLBACK_OPACITY);

    decl
}

/// Layer 1: write every set, non-zero override over `decl`
pub fn apply_overrides(decl: &mut StyleDeclaration, style: &BlockStyle) {
    if let Some(margin) = positive(style.margin) {
        decl.set("margin", px(margin));
    }
    if let Some(padding) = positive(style.padding) {
        decl.set("padding", px(padding));
    }
    if let Some(color) = style.background_color.as_deref().and_then(non_blank) {
        decl.set("background-color", color);
    }
    if let Some(radius) = positive(style.border_radius) {
        decl.set("border-radius", px(radius));
    }
    if let Some(width) = positive(style.width) {
        decl.set("width", format!("{}%", width.min(100.0)));
    }
    if let Some(height) = positive(style.height) {
        decl.set("height", px(height));
    }
    if let Some(opacity) = positive(style.opacity) {
        decl.set("opacity", opacity.min(1.0).to_string());
    }
    if let Some(align) = style.text_align {
        decl.set("text-align", align.as_css());
    }
}

/// Resolve a bare override record against the tokens
pub fn resolve_block_style(tokens: &DesignTokens, style: &BlockStyle) -> StyleDeclaration {
    let mut decl = base_declaration(tokens);
    apply_overrides(&mut decl, style);
    decl
}

/// Resolve the style of `block`, including its type's token defaults
#[instrument(skip(tokens, block), fields(block_id = %block.id, block_type = block.block_type.as_str()))]
pub fn resolve_style_for(tokens: &DesignTokens, block: &ContentBlock) -> StyleDeclaration {
    let mut decl = base_declaration(tokens);

    if let Some(type_defaults) = registry::lookup(block.block_type).style {
        type_defaults(tokens, &mut decl);
    }

    apply_overrides(&mut decl, &block.style);
    trace!(properties = decl.properties.len(), "Resolved block style");
    decl
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_common::{
        BlockId, BlockType, ElevationBucket, Props, RadiusBucket, TextAlign,
    };

    #[test]
    fn test_override_beats_token_beats_fallback() {
        let mut tokens = DesignTokens::default();
        tokens.card.radius = Some(RadiusBucket::Large);

        let token_only = resolve_block_style(&tokens, &BlockStyle::default());
        assert_eq!(token_only.get("border-radius"), Some("16px"));

        let overridden = resolve_block_style(
            &tokens,
            &BlockStyle {
                border_radius: Some(3.0),
                ..Default::default()
            },
        );
        assert_eq!(overridden.get("border-radius"), Some("3px"));

        tokens.card.radius = None;
        let fallback = resolve_block_style(&tokens, &BlockStyle::default());
        assert_eq!(fallback.get("border-radius"), Some("8px"));
    }

    #[test]
    fn test_zero_override_falls_through() {
        let tokens = DesignTokens::default();
        let decl = resolve_block_style(
            &tokens,
            &BlockStyle {
                padding: Some(0.0),
                opacity: Some(0.0),
                margin: Some(f64::NAN),
                ..Default::default()
            },
        );

        assert_eq!(decl.get("padding"), Some("16px"));
        assert_eq!(decl.get("opacity"), Some("1"));
        assert_eq!(decl.get("margin"), Some(FALLBACK_MARGIN));
    }

    #[test]
    fn test_elevation_bucket_maps_to_shadow() {
        let mut tokens = DesignTokens::default();
        tokens.card.elevation = Some(ElevationBucket::High);
        let decl = resolve_block_style(&tokens, &BlockStyle::default());
        assert_eq!(decl.get("box-shadow"), Some(ElevationBucket::High.shadow()));

        tokens.card.elevation = None;
        let decl = resolve_block_style(&tokens, &BlockStyle::default());
        assert_eq!(decl.get("box-shadow"), Some(FALLBACK_SHADOW));
    }

    #[test]
    fn test_surface_color_and_blank_override() {
        let mut tokens = DesignTokens::default();
        tokens.card.surface_color = "#fef3c7".to_string();

        let decl = resolve_block_style(
            &tokens,
            &BlockStyle {
                background_color: Some("  ".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(decl.get("background-color"), Some("#fef3c7"));

        tokens.card.surface_color = String::new();
        let decl = resolve_block_style(&tokens, &BlockStyle::default());
        assert_eq!(decl.get("background-color"), Some(FALLBACK_SURFACE_COLOR));
    }

    #[test]
    fn test_width_and_opacity_are_clamped() {
        let decl = resolve_block_style(
            &DesignTokens::default(),
            &BlockStyle {
                width: Some(150.0),
                opacity: Some(4.0),
                text_align: Some(TextAlign::Right),
                ..Default::default()
            },
        );
        assert_eq!(decl.get("width"), Some("100%"));
        assert_eq!(decl.get("opacity"), Some("1"));
        assert_eq!(decl.get("text-align"), Some("right"));
    }

    #[test]
    fn test_type_defaults_sit_below_overrides() {
        let tokens = DesignTokens::default();
        let mut block = ContentBlock::new(BlockId::new("h-1"), BlockType::Header, Props::new());

        let decl = resolve_style_for(&tokens, &block);
        assert_eq!(decl.get("text-align"), Some("center"));

        block.style.text_align = Some(TextAlign::Left);
        let decl = resolve_style_for(&tokens, &block);
        assert_eq!(decl.get("text-align"), Some("left"));
    }
}
