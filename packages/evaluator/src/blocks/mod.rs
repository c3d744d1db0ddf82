//! Block renderers, one per block kind.
//!
//! Renderers are pure: the same block and tokens always produce the same
//! tree, whichever surface asked for it.

pub mod props;

pub(crate) mod catalog;
pub(crate) mod media;
pub(crate) mod text;

use crate::html::safe_url;
use crate::vdom::VNode;

/// `<a href>` around `child`, or a plain `<span>` when the link is unusable
pub(crate) fn anchor(href: &str, child: VNode) -> VNode {
    match safe_url(href) {
        Some(href) => VNode::element("a").with_attr("href", href).with_child(child),
        None => VNode::element("span").with_child(child),
    }
}

/// Lazy `<img>` for a usable source
pub(crate) fn image(src: &str, alt: &str) -> Option<VNode> {
    safe_url(src).map(|src| {
        VNode::element("img")
            .with_attr("alt", alt)
            .with_attr("loading", "lazy")
            .with_attr("src", src)
    })
}
