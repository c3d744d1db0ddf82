//! # Block Registry
//!
//! Tagged-variant dispatch for the closed block catalog. Each block kind has
//! exactly one entry holding its palette label, its default props, an
//! optional token-derived style layer and its renderer. Adding a kind means
//! adding a `BlockType` variant and one entry here; the content tree never
//! matches on block kinds.

use crate::blocks::{catalog, media, text};
use crate::render::RenderContext;
use crate::style::StyleDeclaration;
use crate::vdom::VNode;
use pagesmith_common::{BlockType, ContentBlock, DesignTokens, Props};

pub type DefaultPropsFn = fn() -> Props;
pub type StyleFn = fn(&DesignTokens, &mut StyleDeclaration);
pub type RenderFn = fn(&ContentBlock, &RenderContext<'_>) -> VNode;

pub struct BlockDefinition {
    pub block_type: BlockType,
    pub label: &'static str,
    pub default_props: DefaultPropsFn,
    /// Type-specific token defaults, applied below block overrides
    pub style: Option<StyleFn>,
    pub render: RenderFn,
}

impl std::fmt::Debug for BlockDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockDefinition")
            .field("block_type", &self.block_type)
            .field("label", &self.label)
            .finish()
    }
}

/// Indexed by `BlockType::index()`
static REGISTRY: [BlockDefinition; 15] = [
    BlockDefinition {
        block_type: BlockType::Header,
        label: "Header",
        default_props: text::header_defaults,
        style: Some(text::header_style),
        render: text::render_header,
    },
    BlockDefinition {
        block_type: BlockType::ImageLink,
        label: "Image link",
        default_props: media::image_link_defaults,
        style: None,
        render: media::render_image_link,
    },
    BlockDefinition {
        block_type: BlockType::ButtonGroup,
        label: "Buttons",
        default_props: text::button_group_defaults,
        style: Some(text::button_group_style),
        render: text::render_button_group,
    },
    BlockDefinition {
        block_type: BlockType::HeadingText,
        label: "Heading & text",
        default_props: text::heading_text_defaults,
        style: None,
        render: text::render_heading_text,
    },
    BlockDefinition {
        block_type: BlockType::Video,
        label: "Video",
        default_props: media::video_defaults,
        style: None,
        render: media::render_video,
    },
    BlockDefinition {
        block_type: BlockType::ImageText,
        label: "Image & text",
        default_props: media::image_text_defaults,
        style: None,
        render: media::render_image_text,
    },
    BlockDefinition {
        block_type: BlockType::SocialLinks,
        label: "Social links",
        default_props: text::social_links_defaults,
        style: Some(text::social_links_style),
        render: text::render_social_links,
    },
    BlockDefinition {
        block_type: BlockType::Contact,
        label: "Contact",
        default_props: text::contact_defaults,
        style: None,
        render: text::render_contact,
    },
    BlockDefinition {
        block_type: BlockType::Ingredients,
        label: "Ingredients",
        default_props: catalog::ingredients_defaults,
        style: None,
        render: catalog::render_ingredients,
    },
    BlockDefinition {
        block_type: BlockType::Address,
        label: "Address",
        default_props: text::address_defaults,
        style: None,
        render: text::render_address,
    },
    BlockDefinition {
        block_type: BlockType::Map,
        label: "Map",
        default_props: media::map_defaults,
        style: Some(media::map_style),
        render: media::render_map,
    },
    BlockDefinition {
        block_type: BlockType::Products,
        label: "Products",
        default_props: catalog::products_defaults,
        style: None,
        render: catalog::render_products,
    },
    BlockDefinition {
        block_type: BlockType::Gallery,
        label: "Gallery",
        default_props: media::gallery_defaults,
        style: None,
        render: media::render_gallery,
    },
    BlockDefinition {
        block_type: BlockType::NutritionTable,
        label: "Nutrition table",
        default_props: catalog::nutrition_table_defaults,
        style: Some(catalog::nutrition_table_style),
        render: catalog::render_nutrition_table,
    },
    BlockDefinition {
        block_type: BlockType::Recipes,
        label: "Recipes",
        default_props: catalog::recipes_defaults,
        style: None,
        render: catalog::render_recipes,
    },
];

pub fn lookup(block_type: BlockType) -> &'static BlockDefinition {
    &REGISTRY[block_type.index()]
}

/// Fresh default props for a new block of `block_type`
pub fn default_props(block_type: BlockType) -> Props {
    (lookup(block_type).default_props)()
}

/// All definitions in palette order
pub fn palette() -> impl Iterator<Item = &'static BlockDefinition> {
    REGISTRY.iter()
}
