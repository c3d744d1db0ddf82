//! # Document Mutations
//!
//! Author intents as values. Each mutation is applied purely: it reads one
//! [`HistorySnapshot`] and produces the next, sharing every untouched block,
//! the tokens and the link metadata with its input.
//!
//! ## Mutation Semantics
//!
//! ### Reorder
//! - Removes the source and re-inserts it directly before the target
//! - No target moves the source to the end
//! - A move that leaves the order unchanged is reported as `NoChange`
//!
//! ### UpdateProps / UpdateStyle
//! - Shallow merge into the addressed block only
//!
//! ### SetSlug
//! - Rejected while the slug is locked

use pagesmith_common::{
    BlockId, BlockStyle, ContentBlock, DesignTokens, HistorySnapshot, LinkMetadata, Props,
    QrAssociation, UtmParams,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    /// Insert a fully formed block, appending when `index` is `None`
    AddBlock {
        block: ContentBlock,
        index: Option<usize>,
    },

    RemoveBlock {
        id: BlockId,
    },

    UpdateProps {
        id: BlockId,
        props: Props,
    },

    UpdateStyle {
        id: BlockId,
        style: BlockStyle,
    },

    /// Single drag-drop: one mutation, one undo step
    Reorder {
        source: BlockId,
        target: Option<BlockId>,
    },

    /// Copy `source` under `new_id`, directly after it
    DuplicateBlock {
        source: BlockId,
        new_id: BlockId,
    },

    SetDesignTokens {
        tokens: DesignTokens,
    },

    SetSlug {
        slug: String,
    },

    SetLocked {
        locked: bool,
    },

    /// Campaign, folder and UTM fields; `None` leaves a field as it is
    UpdateLinkFields {
        campaign: Option<String>,
        folder: Option<String>,
        utm: Option<UtmParams>,
    },

    AttachQr {
        qr: Option<QrAssociation>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Block id already in use: {0}")]
    DuplicateId(BlockId),

    #[error("Slug is locked")]
    SlugLocked,

    #[error("Mutation would not change the document")]
    NoChange,
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "add_block",
            Mutation::RemoveBlock { .. } => "remove_block",
            Mutation::UpdateProps { .. } => "update_props",
            Mutation::UpdateStyle { .. } => "update_style",
            Mutation::Reorder { .. } => "reorder",
            Mutation::DuplicateBlock { .. } => "duplicate_block",
            Mutation::SetDesignTokens { .. } => "set_design_tokens",
            Mutation::SetSlug { .. } => "set_slug",
            Mutation::SetLocked { .. } => "set_locked",
            Mutation::UpdateLinkFields { .. } => "update_link_fields",
            Mutation::AttachQr { .. } => "attach_qr",
        }
    }

    /// Produce the snapshot that follows `current`
    pub fn apply(&self, current: &HistorySnapshot) -> Result<HistorySnapshot, MutationError> {
        match self {
            Mutation::AddBlock { block, index } => Self::apply_add(current, block, *index),

            Mutation::RemoveBlock { id } => Self::apply_remove(current, id),

            Mutation::UpdateProps { id, props } => {
                Self::replace_block(current, id, |block| block.with_props_merged(props))
            }

            Mutation::UpdateStyle { id, style } => {
                Self::replace_block(current, id, |block| block.with_style_merged(style))
            }

            Mutation::Reorder { source, target } => {
                Self::apply_reorder(current, source, target.as_ref())
            }

            Mutation::DuplicateBlock { source, new_id } => {
                Self::apply_duplicate(current, source, new_id)
            }

            Mutation::SetDesignTokens { tokens } => {
                if *current.design_tokens == *tokens {
                    return Err(MutationError::NoChange);
                }
                Ok(HistorySnapshot {
                    design_tokens: Arc::new(tokens.clone()),
                    ..current.clone()
                })
            }

            Mutation::SetSlug { slug } => {
                if current.link_metadata.is_locked {
                    return Err(MutationError::SlugLocked);
                }
                Self::with_link(current, |link| link.slug = slug.clone())
            }

            Mutation::SetLocked { locked } => {
                Self::with_link(current, |link| link.is_locked = *locked)
            }

            Mutation::UpdateLinkFields {
                campaign,
                folder,
                utm,
            } => Self::with_link(current, |link| {
                if let Some(campaign) = campaign {
                    link.campaign = Some(campaign.clone()).filter(|c| !c.is_empty());
                }
                if let Some(folder) = folder {
                    link.folder = Some(folder.clone()).filter(|f| !f.is_empty());
                }
                if let Some(utm) = utm {
                    link.utm = utm.clone();
                }
            }),

            Mutation::AttachQr { qr } => Self::with_link(current, |link| link.qr = qr.clone()),
        }
    }

    fn apply_add(
        current: &HistorySnapshot,
        block: &ContentBlock,
        index: Option<usize>,
    ) -> Result<HistorySnapshot, MutationError> {
        if current.find_block(&block.id).is_some() {
            return Err(MutationError::DuplicateId(block.id.clone()));
        }

        let mut next = current.clone();
        let index = index
            .unwrap_or(next.content_blocks.len())
            .min(next.content_blocks.len());
        next.content_blocks.insert(index, Arc::new(block.clone()));
        Ok(next)
    }

    fn apply_remove(
        current: &HistorySnapshot,
        id: &BlockId,
    ) -> Result<HistorySnapshot, MutationError> {
        let index = current
            .position_of(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;

        let mut next = current.clone();
        next.content_blocks.remove(index);
        Ok(next)
    }

    /// Swap in a rebuilt copy of one block; the rest stay shared
    fn replace_block(
        current: &HistorySnapshot,
        id: &BlockId,
        rebuild: impl FnOnce(&ContentBlock) -> ContentBlock,
    ) -> Result<HistorySnapshot, MutationError> {
        let index = current
            .position_of(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;

        let updated = rebuild(&current.content_blocks[index]);
        if updated == *current.content_blocks[index] {
            return Err(MutationError::NoChange);
        }

        let mut next = current.clone();
        next.content_blocks[index] = Arc::new(updated);
        Ok(next)
    }

    fn apply_reorder(
        current: &HistorySnapshot,
        source: &BlockId,
        target: Option<&BlockId>,
    ) -> Result<HistorySnapshot, MutationError> {
        if target == Some(source) {
            return Err(MutationError::NoChange);
        }

        let from = current
            .position_of(source)
            .ok_or_else(|| MutationError::BlockNotFound(source.clone()))?;
        if let Some(target) = target {
            if current.position_of(target).is_none() {
                return Err(MutationError::BlockNotFound(target.clone()));
            }
        }

        let mut blocks = current.content_blocks.clone();
        let moving = blocks.remove(from);
        let to = match target {
            Some(target) => blocks
                .iter()
                .position(|block| &block.id == target)
                .ok_or_else(|| MutationError::BlockNotFound(target.clone()))?,
            None => blocks.len(),
        };
        blocks.insert(to, moving);

        if to == from {
            return Err(MutationError::NoChange);
        }

        Ok(HistorySnapshot {
            content_blocks: blocks,
            ..current.clone()
        })
    }

    fn apply_duplicate(
        current: &HistorySnapshot,
        source: &BlockId,
        new_id: &BlockId,
    ) -> Result<HistorySnapshot, MutationError> {
        let index = current
            .position_of(source)
            .ok_or_else(|| MutationError::BlockNotFound(source.clone()))?;
        if current.find_block(new_id).is_some() {
            return Err(MutationError::DuplicateId(new_id.clone()));
        }

        let copy = ContentBlock {
            id: new_id.clone(),
            ..ContentBlock::clone(&current.content_blocks[index])
        };
        let mut next = current.clone();
        next.content_blocks.insert(index + 1, Arc::new(copy));
        Ok(next)
    }

    fn with_link(
        current: &HistorySnapshot,
        edit: impl FnOnce(&mut LinkMetadata),
    ) -> Result<HistorySnapshot, MutationError> {
        let mut link = LinkMetadata::clone(&current.link_metadata);
        edit(&mut link);
        if link == *current.link_metadata {
            return Err(MutationError::NoChange);
        }

        Ok(HistorySnapshot {
            link_metadata: Arc::new(link),
            ..current.clone()
        })
    }
}
