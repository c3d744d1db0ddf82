//! # Page Document
//!
//! The composite the studio edits and the page store persists. Only
//! `content_blocks`, `design_tokens` and `link_metadata` take part in
//! undo/redo; they travel together as a [`HistorySnapshot`].

use crate::block::ContentBlock;
use crate::ids::BlockId;
use crate::link::LinkMetadata;
use crate::tokens::DesignTokens;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier assigned by the page store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Landing,
    Product,
}

impl PageKind {
    /// Landing page names must be unique; product page names need not be
    pub fn requires_unique_name(self) -> bool {
        matches!(self, PageKind::Landing)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Publishing,
    Published,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    pub page_name: String,
    pub kind: PageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Storage mirror of `LinkMetadata::slug`, written at save time only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublishInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: u64,
}

/// Immutable undo/redo unit.
///
/// Blocks, tokens and metadata sit behind `Arc`s so a snapshot taken after
/// editing one block shares everything else with the one before it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub content_blocks: Vec<Arc<ContentBlock>>,
    pub design_tokens: Arc<DesignTokens>,
    pub link_metadata: Arc<LinkMetadata>,
}

impl HistorySnapshot {
    pub fn find_block(&self, id: &BlockId) -> Option<&Arc<ContentBlock>> {
        self.content_blocks.iter().find(|block| &block.id == id)
    }

    pub fn position_of(&self, id: &BlockId) -> Option<usize> {
        self.content_blocks.iter().position(|block| &block.id == id)
    }

    pub fn block_ids(&self) -> impl Iterator<Item = &BlockId> {
        self.content_blocks.iter().map(|block| &block.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PageId>,
    pub content_blocks: Vec<ContentBlock>,
    pub design_tokens: DesignTokens,
    pub link_metadata: LinkMetadata,
    pub page_settings: PageSettings,
    pub status: PageStatus,
    pub publish_info: PublishInfo,
}

impl PageDocument {
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            content_blocks: self.content_blocks.iter().cloned().map(Arc::new).collect(),
            design_tokens: Arc::new(self.design_tokens.clone()),
            link_metadata: Arc::new(self.link_metadata.clone()),
        }
    }

    /// Replace the history-tracked parts with `snapshot`
    pub fn apply_snapshot(&mut self, snapshot: &HistorySnapshot) {
        self.content_blocks = snapshot
            .content_blocks
            .iter()
            .map(|block| ContentBlock::clone(block))
            .collect();
        self.design_tokens = DesignTokens::clone(&snapshot.design_tokens);
        self.link_metadata = LinkMetadata::clone(&snapshot.link_metadata);
    }

    /// Copy `link_metadata.slug` into the storage mirror
    pub fn sync_slug_mirror(&mut self) {
        let slug = self.link_metadata.slug.trim();
        self.page_settings.slug = (!slug.is_empty()).then(|| slug.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::Props;

    #[test]
    fn test_snapshot_round_trip_through_document() {
        let mut doc = PageDocument::default();
        doc.content_blocks.push(ContentBlock::new(
            BlockId::new("p-1"),
            BlockType::Header,
            Props::new(),
        ));
        doc.link_metadata.slug = "spring-sale".to_string();

        let snapshot = doc.snapshot();
        let mut restored = PageDocument::default();
        restored.apply_snapshot(&snapshot);

        assert_eq!(restored.content_blocks, doc.content_blocks);
        assert_eq!(restored.link_metadata.slug, "spring-sale");
    }

    #[test]
    fn test_slug_mirror_is_derived() {
        let mut doc = PageDocument::default();
        doc.sync_slug_mirror();
        assert_eq!(doc.page_settings.slug, None);

        doc.link_metadata.slug = "menu-2024".to_string();
        doc.sync_slug_mirror();
        assert_eq!(doc.page_settings.slug.as_deref(), Some("menu-2024"));
    }

    #[test]
    fn test_only_landing_pages_need_unique_names() {
        assert!(PageKind::Landing.requires_unique_name());
        assert!(!PageKind::Product.requires_unique_name());
    }
}
