//! # Published Viewer
//!
//! Read-only renderer for published pages. The payload comes from storage
//! and is treated as untrusted: blocks that fail to decode are skipped, a
//! broken token set falls back to defaults, and all text is escaped by the
//! HTML serializer.

use crate::html::escape_html;
use crate::render::{render_page, RenderSurface, RenderedPage};
use pagesmith_common::{ContentBlock, DesignTokens};
use serde_json::Value;
use thiserror::Error;
use tracing::{instrument, warn};

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Published payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Published payload must be a JSON object")]
    NotAnObject,
}

/// Decoded published payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishedViewer {
    pub blocks: Vec<ContentBlock>,
    pub tokens: DesignTokens,
    /// Number of blocks dropped while decoding
    pub skipped: usize,
}

impl PublishedViewer {
    pub fn new(blocks: Vec<ContentBlock>, tokens: DesignTokens) -> Self {
        Self {
            blocks,
            tokens,
            skipped: 0,
        }
    }

    pub fn from_json(source: &str) -> Result<Self, ViewerError> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(&value)
    }

    /// Decode `{ contentBlocks, designTokens }`
    #[instrument(skip(payload))]
    pub fn from_value(payload: &Value) -> Result<Self, ViewerError> {
        let object = payload.as_object().ok_or(ViewerError::NotAnObject)?;

        let mut viewer = PublishedViewer::default();

        match object.get("contentBlocks") {
            Some(Value::Array(entries)) => {
                for (index, entry) in entries.iter().enumerate() {
                    match serde_json::from_value::<ContentBlock>(entry.clone()) {
                        Ok(block) => viewer.blocks.push(block),
                        Err(error) => {
                            warn!(index, %error, "Skipping malformed block");
                            viewer.skipped += 1;
                        }
                    }
                }
            }
            None | Some(Value::Null) => {}
            Some(_) => warn!("contentBlocks is not an array, rendering an empty page"),
        }

        if let Some(tokens) = object.get("designTokens").filter(|v| !v.is_null()) {
            match serde_json::from_value::<DesignTokens>(tokens.clone()) {
                Ok(tokens) => viewer.tokens = tokens,
                Err(error) => warn!(%error, "Invalid design tokens, using defaults"),
            }
        }

        Ok(viewer)
    }

    pub fn render(&self) -> RenderedPage {
        render_page(&self.blocks, &self.tokens, RenderSurface::Viewer)
    }

    /// Page fragment, identical to what the canvas renders
    pub fn to_html(&self) -> String {
        self.render().to_html()
    }

    /// Standalone HTML document around the page fragment
    pub fn to_document(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n\
             <title>{}</title>\n</head>\n<body style=\"margin: 0\">\n{}\n</body>\n</html>\n",
            escape_html(title),
            self.to_html()
        )
    }
}
