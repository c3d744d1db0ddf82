//! # Pagesmith Evaluator
//!
//! Turns design tokens and content blocks into styled markup.
//!
//! ```text
//! tokens + blocks ─▶ style resolver ─▶ block registry ─▶ VNode tree ─▶ HTML
//! ```
//!
//! The authoring canvas and the published viewer share this whole pipeline,
//! so the same document always produces the same bytes on both surfaces.

pub mod background;
pub mod blocks;
pub mod html;
pub mod registry;
pub mod render;
pub mod style;
pub mod vdom;
pub mod viewer;

pub use background::{resolve_page_background, PageBackground};
pub use registry::{default_props, lookup, palette, BlockDefinition};
pub use render::{
    render_block, render_page, RenderContext, RenderSurface, RenderedBlock, RenderedPage,
};
pub use style::{resolve_block_style, resolve_style_for, StyleDeclaration};
pub use vdom::VNode;
pub use viewer::{PublishedViewer, ViewerError};
