//! # Page Rendering
//!
//! One pipeline for both surfaces: tokens and blocks go through the style
//! resolver and the block registry, producing a [`RenderedPage`] whose HTML
//! is byte-identical for the authoring canvas and the published viewer.

use crate::background::resolve_page_background;
use crate::html::sanitize_css_value;
use crate::registry;
use crate::style::{font_size, font_stack, resolve_style_for, StyleDeclaration};
use crate::vdom::VNode;
use pagesmith_common::{BlockId, BlockType, ContentBlock, DesignTokens};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const FALLBACK_LINK_COLOR: &str = "#2563eb";
const FALLBACK_CTA_COLOR: &str = "#111827";

/// Who asked for the render. Recorded in traces, never changes the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderSurface {
    Canvas,
    Viewer,
}

impl RenderSurface {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderSurface::Canvas => "canvas",
            RenderSurface::Viewer => "viewer",
        }
    }
}

pub struct RenderContext<'a> {
    pub tokens: &'a DesignTokens,
    pub surface: RenderSurface,
}

impl<'a> RenderContext<'a> {
    pub fn new(tokens: &'a DesignTokens, surface: RenderSurface) -> Self {
        Self { tokens, surface }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedBlock {
    pub id: BlockId,
    pub block_type: BlockType,
    pub style: StyleDeclaration,
    pub node: VNode,
}

impl RenderedBlock {
    /// `<section>` wrapper carrying the resolved block style
    pub fn to_vnode(&self) -> VNode {
        VNode::element("section")
            .with_attr(
                "class",
                format!("ps-block ps-block--{}", self.block_type.as_str()),
            )
            .with_attr("data-block-id", self.id.as_str())
            .with_styles(&self.style.properties)
            .with_child(self.node.clone())
    }
}

pub fn render_block(block: &ContentBlock, ctx: &RenderContext<'_>) -> RenderedBlock {
    let definition = registry::lookup(block.block_type);
    RenderedBlock {
        id: block.id.clone(),
        block_type: block.block_type,
        style: resolve_style_for(ctx.tokens, block),
        node: (definition.render)(block, ctx),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub root_style: StyleDeclaration,
    pub scrim: Option<StyleDeclaration>,
    pub blocks: Vec<RenderedBlock>,
}

fn color_or(value: &str, fallback: &str) -> String {
    let cleaned = sanitize_css_value(value);
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Background layer, body typography and the link/CTA color variables
fn root_style(tokens: &DesignTokens) -> (StyleDeclaration, Option<StyleDeclaration>) {
    let background = resolve_page_background(tokens);
    let mut decl = background.declaration;

    decl.set("font-family", font_stack(&tokens.typography.body_font));
    decl.set("font-size", font_size(tokens.typography.body_size));
    decl.set("min-height", "100%");
    decl.set("position", "relative");

    let link = &tokens.link_colors;
    let link_default = color_or(&link.default, FALLBACK_LINK_COLOR);
    decl.set("--link-hover-color", color_or(&link.hover, &link_default));
    decl.set("--link-active-color", color_or(&link.active, &link_default));
    decl.set("--link-color", link_default);

    let cta = &tokens.cta_colors;
    let cta_default = color_or(&cta.default, FALLBACK_CTA_COLOR);
    decl.set("--cta-hover-color", color_or(&cta.hover, &cta_default));
    decl.set("--cta-active-color", color_or(&cta.active, &cta_default));
    decl.set("--cta-color", cta_default);

    (decl, background.scrim)
}

/// Render `blocks` in order against `tokens`
#[instrument(skip(blocks, tokens), fields(surface = surface.as_str(), blocks = blocks.len()))]
pub fn render_page(
    blocks: &[ContentBlock],
    tokens: &DesignTokens,
    surface: RenderSurface,
) -> RenderedPage {
    let ctx = RenderContext::new(tokens, surface);
    let (root_style, scrim) = root_style(tokens);
    let blocks = blocks
        .iter()
        .map(|block| render_block(block, &ctx))
        .collect::<Vec<_>>();

    debug!(rendered = blocks.len(), "Rendered page");
    RenderedPage {
        root_style,
        scrim,
        blocks,
    }
}

impl RenderedPage {
    pub fn to_vnode(&self) -> VNode {
        let mut page = VNode::element("div")
            .with_attr("class", "ps-page")
            .with_styles(&self.root_style.properties);

        if let Some(scrim) = &self.scrim {
            page = page.with_child(
                VNode::element("div")
                    .with_attr("aria-hidden", "true")
                    .with_attr("class", "ps-scrim")
                    .with_styles(&scrim.properties),
            );
        }

        page.with_child(
            VNode::element("div")
                .with_attr("class", "ps-content")
                .with_style("position", "relative")
                .with_children(self.blocks.iter().map(RenderedBlock::to_vnode)),
        )
    }

    pub fn to_html(&self) -> String {
        self.to_vnode().to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::props::object;
    use serde_json::json;

    fn sample_blocks() -> Vec<ContentBlock> {
        vec![
            ContentBlock::new(
                BlockId::new("p-1"),
                BlockType::Header,
                object(json!({"title": "Nordic <Bakery>", "subtitle": "Fresh daily"})),
            ),
            ContentBlock::new(
                BlockId::new("p-2"),
                BlockType::ButtonGroup,
                object(json!({"buttons": [{"label": "Order", "href": "https://shop.test"}]})),
            ),
        ]
    }

    #[test]
    fn test_surfaces_render_identically() {
        let tokens = DesignTokens::default();
        let blocks = sample_blocks();

        let canvas = render_page(&blocks, &tokens, RenderSurface::Canvas);
        let viewer = render_page(&blocks, &tokens, RenderSurface::Viewer);

        assert_eq!(canvas, viewer);
        assert_eq!(canvas.to_html(), viewer.to_html());
    }

    #[test]
    fn test_page_html_wraps_blocks_in_order() {
        let html = render_page(&sample_blocks(), &DesignTokens::default(), RenderSurface::Viewer)
            .to_html();

        assert!(html.starts_with("<div class=\"ps-page\""));
        let first = html.find("data-block-id=\"p-1\"").unwrap();
        let second = html.find("data-block-id=\"p-2\"").unwrap();
        assert!(first < second);
        assert!(html.contains("Nordic &lt;Bakery&gt;"));
        assert!(!html.contains("ps-scrim"));
    }

    #[test]
    fn test_scrim_rendered_for_overlaid_image() {
        let mut tokens = DesignTokens::default();
        tokens.background.image = Some("/hero.jpg".to_string());
        tokens.background.overlay = 50;

        let page = render_page(&[], &tokens, RenderSurface::Viewer);
        assert!(page.scrim.is_some());
        assert!(page.to_html().contains("class=\"ps-scrim\""));
    }

    #[test]
    fn test_color_variables_fall_back_to_default() {
        let mut tokens = DesignTokens::default();
        tokens.link_colors.default = "#ff00aa".to_string();
        tokens.link_colors.hover = String::new();

        let page = render_page(&[], &tokens, RenderSurface::Canvas);
        assert_eq!(page.root_style.get("--link-color"), Some("#ff00aa"));
        assert_eq!(page.root_style.get("--link-hover-color"), Some("#ff00aa"));
    }
}
