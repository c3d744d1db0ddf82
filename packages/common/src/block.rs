//! # Content Blocks
//!
//! A page is an ordered list of typed blocks. The set of block kinds is
//! closed; each kind's prop shape and defaults live in the evaluator's
//! block registry.

use crate::ids::BlockId;
use serde::{Deserialize, Serialize};

/// Type-specific payload of a block
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Closed set of block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Header,
    ImageLink,
    ButtonGroup,
    HeadingText,
    Video,
    ImageText,
    SocialLinks,
    Contact,
    Ingredients,
    Address,
    Map,
    Products,
    Gallery,
    NutritionTable,
    Recipes,
}

impl BlockType {
    /// Every block kind, in palette order
    pub const ALL: [BlockType; 15] = [
        BlockType::Header,
        BlockType::ImageLink,
        BlockType::ButtonGroup,
        BlockType::HeadingText,
        BlockType::Video,
        BlockType::ImageText,
        BlockType::SocialLinks,
        BlockType::Contact,
        BlockType::Ingredients,
        BlockType::Address,
        BlockType::Map,
        BlockType::Products,
        BlockType::Gallery,
        BlockType::NutritionTable,
        BlockType::Recipes,
    ];

    /// Position in [`BlockType::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name (`image-link`, `nutrition-table`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Header => "header",
            BlockType::ImageLink => "image-link",
            BlockType::ButtonGroup => "button-group",
            BlockType::HeadingText => "heading-text",
            BlockType::Video => "video",
            BlockType::ImageText => "image-text",
            BlockType::SocialLinks => "social-links",
            BlockType::Contact => "contact",
            BlockType::Ingredients => "ingredients",
            BlockType::Address => "address",
            BlockType::Map => "map",
            BlockType::Products => "products",
            BlockType::Gallery => "gallery",
            BlockType::NutritionTable => "nutrition-table",
            BlockType::Recipes => "recipes",
        }
    }
}

/// Horizontal text alignment override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

/// Per-block style overrides.
///
/// Unset fields (and zero numeric values) fall back to the design-token
/// cascade. Lengths are pixels except `width`, which is a percentage of the
/// page column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl BlockStyle {
    /// Shallow merge: every field set in `patch` replaces ours
    pub fn merged(&self, patch: &BlockStyle) -> BlockStyle {
        BlockStyle {
            margin: patch.margin.or(self.margin),
            padding: patch.padding.or(self.padding),
            background_color: patch
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            border_radius: patch.border_radius.or(self.border_radius),
            width: patch.width.or(self.width),
            height: patch.height.or(self.height),
            opacity: patch.opacity.or(self.opacity),
            text_align: patch.text_align.or(self.text_align),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == BlockStyle::default()
    }
}

/// One typed, styleable unit of page content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub id: BlockId,

    #[serde(rename = "type")]
    pub block_type: BlockType,

    #[serde(default)]
    pub props: Props,

    #[serde(default, skip_serializing_if = "BlockStyle::is_empty")]
    pub style: BlockStyle,
}

impl ContentBlock {
    pub fn new(id: BlockId, block_type: BlockType, props: Props) -> Self {
        Self {
            id,
            block_type,
            props,
            style: BlockStyle::default(),
        }
    }

    /// Copy with `partial`'s top-level keys written over ours
    pub fn with_props_merged(&self, partial: &Props) -> ContentBlock {
        let mut props = self.props.clone();
        for (key, value) in partial {
            props.insert(key.clone(), value.clone());
        }
        ContentBlock {
            props,
            ..self.clone()
        }
    }

    pub fn with_style_merged(&self, patch: &BlockStyle) -> ContentBlock {
        ContentBlock {
            style: self.style.merged(patch),
            ..self.clone()
        }
    }
}
