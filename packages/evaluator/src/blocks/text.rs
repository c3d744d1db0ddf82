//! Text-led blocks: header, heading + text, buttons, social links,
//! contact details and postal address.

use super::props::{field, object, PropsExt};
use super::{anchor, image};
use crate::render::RenderContext;
use crate::style::{font_size, font_stack, px, StyleDeclaration};
use crate::vdom::VNode;
use pagesmith_common::{ContentBlock, DesignTokens, Props};
use serde_json::json;

pub(crate) fn header_defaults() -> Props {
    object(json!({
        "title": "Your brand",
        "subtitle": "A short tagline for your page",
        "logoUrl": "",
    }))
}

pub(crate) fn header_style(tokens: &DesignTokens, decl: &mut StyleDeclaration) {
    decl.set("text-align", "center");
    decl.set("font-family", font_stack(&tokens.typography.heading_font));
}

pub(crate) fn render_header(block: &ContentBlock, ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let mut header = VNode::element("header").with_attr("class", "ps-header");

    if let Some(logo) = image(props.text("logoUrl"), props.text("title")) {
        header = header.with_child(logo.with_attr("class", "ps-header__logo"));
    }
    header = header.with_child(
        VNode::text_element("h1", props.text("title"))
            .with_style("font-size", font_size(ctx.tokens.typography.heading_size)),
    );
    if !props.text("subtitle").is_empty() {
        header = header.with_child(VNode::text_element("p", props.text("subtitle")));
    }
    header
}

pub(crate) fn heading_text_defaults() -> Props {
    object(json!({
        "heading": "Heading",
        "text": "Tell your story here.",
        "level": 2,
    }))
}

pub(crate) fn render_heading_text(block: &ContentBlock, ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let level = props.number("level", 2.0).clamp(1.0, 6.0) as u8;
    let typography = &ctx.tokens.typography;

    let mut section = VNode::element("div").with_attr("class", "ps-heading-text");
    if !props.text("heading").is_empty() {
        section = section.with_child(
            VNode::text_element(format!("h{}", level), props.text("heading"))
                .with_style("font-family", font_stack(&typography.heading_font))
                .with_style("font-size", font_size(typography.heading_size)),
        );
    }
    // Paragraph breaks in the editor become separate <p> elements
    section.with_children(
        props
            .text("text")
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| VNode::text_element("p", p)),
    )
}

pub(crate) fn button_group_defaults() -> Props {
    object(json!({
        "layout": "stack",
        "buttons": [
            {"label": "Shop now", "href": "https://", "variant": "primary"},
        ],
    }))
}

/// Buttons sit directly on the page background
pub(crate) fn button_group_style(_tokens: &DesignTokens, decl: &mut StyleDeclaration) {
    decl.set("background-color", "transparent");
    decl.set("box-shadow", "none");
}

pub(crate) fn render_button_group(block: &ContentBlock, ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let layout = match props.text("layout") {
        "row" => "row",
        _ => "stack",
    };
    let typography = &ctx.tokens.typography;

    let buttons = props.list("buttons").iter().map(|button| {
        let variant = match field(button, "variant") {
            "secondary" => "secondary",
            _ => "primary",
        };
        let label = VNode::text(field(button, "label"));
        let node = anchor(field(button, "href"), label)
            .with_attr("class", format!("ps-button ps-button--{}", variant))
            .with_style("font-family", font_stack(&typography.label_font))
            .with_style("font-size", font_size(typography.label_size))
            .with_style("padding", format!("{} {}", px(12.0), px(20.0)));

        if variant == "primary" {
            node.with_style("background-color", "var(--cta-color)")
                .with_style("color", "#ffffff")
        } else {
            node.with_style("border", "1px solid var(--cta-color)")
                .with_style("color", "var(--cta-color)")
        }
    });

    VNode::element("div")
        .with_attr("class", format!("ps-buttons ps-buttons--{}", layout))
        .with_children(buttons)
}

pub(crate) fn social_links_defaults() -> Props {
    object(json!({
        "links": [
            {"platform": "instagram", "url": ""},
            {"platform": "facebook", "url": ""},
        ],
    }))
}

pub(crate) fn social_links_style(_tokens: &DesignTokens, decl: &mut StyleDeclaration) {
    decl.set("text-align", "center");
}

pub(crate) fn render_social_links(block: &ContentBlock, _ctx: &RenderContext<'_>) -> VNode {
    let items = block
        .props
        .list("links")
        .iter()
        .filter(|link| !field(link, "url").is_empty())
        .map(|link| {
            let platform = field(link, "platform");
            VNode::element("li").with_child(
                anchor(field(link, "url"), VNode::text(platform))
                    .with_attr("class", format!("ps-social ps-social--{}", platform))
                    .with_attr("rel", "noopener")
                    .with_style("color", "var(--link-color)"),
            )
        });

    VNode::element("ul")
        .with_attr("class", "ps-social-links")
        .with_children(items)
}

pub(crate) fn contact_defaults() -> Props {
    object(json!({
        "label": "Get in touch",
        "email": "",
        "phone": "",
        "website": "",
    }))
}

pub(crate) fn render_contact(block: &ContentBlock, _ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let mut contact = VNode::element("div").with_attr("class", "ps-contact");

    if !props.text("label").is_empty() {
        contact = contact.with_child(VNode::text_element("h3", props.text("label")));
    }

    let rows = [
        ("email", "mailto:"),
        ("phone", "tel:"),
        ("website", ""),
    ];
    for (key, scheme) in rows {
        let value = props.text(key);
        if value.is_empty() {
            continue;
        }
        let href = if key == "phone" {
            format!("{}{}", scheme, value.replace(' ', ""))
        } else {
            format!("{}{}", scheme, value)
        };
        contact = contact.with_child(
            VNode::element("p")
                .with_attr("class", format!("ps-contact__{}", key))
                .with_child(anchor(&href, VNode::text(value)).with_style("color", "var(--link-color)")),
        );
    }
    contact
}

pub(crate) fn address_defaults() -> Props {
    object(json!({
        "line1": "",
        "line2": "",
        "city": "",
        "region": "",
        "postalCode": "",
        "country": "",
    }))
}

pub(crate) fn render_address(block: &ContentBlock, _ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let locality = [props.text("postalCode"), props.text("city"), props.text("region")]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let lines = [
        props.text("line1").to_string(),
        props.text("line2").to_string(),
        locality,
        props.text("country").to_string(),
    ];

    let mut address = VNode::element("address").with_attr("class", "ps-address");
    let mut first = true;
    for line in lines.iter().filter(|line| !line.is_empty()) {
        if !first {
            address = address.with_child(VNode::element("br"));
        }
        address = address.with_child(VNode::text(line.as_str()));
        first = false;
    }
    address
}
