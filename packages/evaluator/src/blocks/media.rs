//! Media blocks: image link, video, image + text, gallery and map.

use super::props::{field, object, PropsExt};
use super::{anchor, image};
use crate::html::{encode_query_component, safe_url};
use crate::render::RenderContext;
use crate::style::{font_size, font_stack, StyleDeclaration};
use crate::vdom::VNode;
use pagesmith_common::{ContentBlock, DesignTokens, Props};
use serde_json::json;

pub(crate) fn image_link_defaults() -> Props {
    object(json!({
        "imageUrl": "",
        "href": "",
        "alt": "",
        "caption": "",
    }))
}

pub(crate) fn render_image_link(block: &ContentBlock, _ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let mut figure = VNode::element("figure").with_attr("class", "ps-image-link");

    let picture = image(props.text("imageUrl"), props.text("alt"))
        .unwrap_or_else(|| VNode::element("div").with_attr("class", "ps-placeholder"));
    figure = figure.with_child(if props.text("href").is_empty() {
        picture
    } else {
        anchor(props.text("href"), picture)
    });

    if !props.text("caption").is_empty() {
        figure = figure.with_child(VNode::text_element("figcaption", props.text("caption")));
    }
    figure
}

pub(crate) fn video_defaults() -> Props {
    object(json!({
        "url": "",
        "title": "",
        "autoplay": false,
    }))
}

fn is_video_file(url: &str) -> bool {
    let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or("").to_ascii_lowercase();
    [".mp4", ".webm", ".ogg", ".mov"]
        .iter()
        .any(|ext| path.ends_with(ext))
}

pub(crate) fn render_video(block: &ContentBlock, _ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let wrapper = VNode::element("div").with_attr("class", "ps-video");

    let Some(url) = safe_url(props.text("url")) else {
        return wrapper.with_child(VNode::element("div").with_attr("class", "ps-placeholder"));
    };

    let player = if is_video_file(&url) {
        let mut video = VNode::element("video")
            .with_attr("controls", "controls")
            .with_attr("src", url);
        if props.flag("autoplay") {
            video = video
                .with_attr("autoplay", "autoplay")
                .with_attr("muted", "muted");
        }
        video
    } else {
        VNode::element("iframe")
            .with_attr("allowfullscreen", "allowfullscreen")
            .with_attr("src", url)
            .with_attr("title", props.text("title"))
    };

    wrapper.with_child(player.with_style("width", "100%"))
}

pub(crate) fn image_text_defaults() -> Props {
    object(json!({
        "imageUrl": "",
        "alt": "",
        "heading": "Heading",
        "text": "Describe the picture.",
        "imagePosition": "left",
    }))
}

pub(crate) fn render_image_text(block: &ContentBlock, ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let position = match props.text("imagePosition") {
        "right" => "right",
        _ => "left",
    };
    let typography = &ctx.tokens.typography;

    let media = image(props.text("imageUrl"), props.text("alt"))
        .unwrap_or_else(|| VNode::element("div").with_attr("class", "ps-placeholder"));
    let mut copy = VNode::element("div").with_attr("class", "ps-image-text__copy");
    if !props.text("heading").is_empty() {
        copy = copy.with_child(
            VNode::text_element("h3", props.text("heading"))
                .with_style("font-family", font_stack(&typography.heading_font)),
        );
    }
    if !props.text("text").is_empty() {
        copy = copy.with_child(VNode::text_element("p", props.text("text")));
    }

    let children = if position == "left" {
        vec![media, copy]
    } else {
        vec![copy, media]
    };
    VNode::element("div")
        .with_attr("class", format!("ps-image-text ps-image-text--{}", position))
        .with_style("display", "flex")
        .with_style("gap", "16px")
        .with_children(children)
}

pub(crate) fn gallery_defaults() -> Props {
    object(json!({
        "columns": 3,
        "images": [],
    }))
}

pub(crate) fn render_gallery(block: &ContentBlock, ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let columns = props.number("columns", 3.0).clamp(1.0, 6.0) as u8;

    let tiles = props.list("images").iter().filter_map(|entry| {
        let tile = image(field(entry, "url"), field(entry, "alt"))?;
        let caption = field(entry, "caption");
        let mut figure = VNode::element("figure").with_child(tile);
        if !caption.is_empty() {
            figure = figure.with_child(
                VNode::text_element("figcaption", caption)
                    .with_style("font-size", font_size(ctx.tokens.typography.label_size)),
            );
        }
        Some(figure)
    });

    VNode::element("div")
        .with_attr("class", "ps-gallery")
        .with_style("display", "grid")
        .with_style("gap", "8px")
        .with_style(
            "grid-template-columns",
            format!("repeat({}, minmax(0, 1fr))", columns),
        )
        .with_children(tiles)
}

pub(crate) fn map_defaults() -> Props {
    object(json!({
        "query": "",
        "zoom": 14,
        "height": 280,
    }))
}

pub(crate) fn map_style(_tokens: &DesignTokens, decl: &mut StyleDeclaration) {
    decl.set("padding", "0");
}

pub(crate) fn render_map(block: &ContentBlock, _ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let query = props.text("query");
    let wrapper = VNode::element("div").with_attr("class", "ps-map");
    if query.is_empty() {
        return wrapper.with_child(VNode::element("div").with_attr("class", "ps-placeholder"));
    }

    let zoom = props.number("zoom", 14.0).clamp(1.0, 20.0) as u8;
    let height = props.number("height", 280.0).clamp(120.0, 800.0);
    let src = format!(
        "https://maps.google.com/maps?q={}&z={}&output=embed",
        encode_query_component(query),
        zoom
    );

    wrapper.with_child(
        VNode::element("iframe")
            .with_attr("loading", "lazy")
            .with_attr("src", src)
            .with_attr("title", query)
            .with_style("border", "0")
            .with_style("height", format!("{}px", height))
            .with_style("width", "100%"),
    )
}
