//! # Content Tree
//!
//! The ordered block list of one page, together with its design tokens and
//! link metadata. Every author action becomes a [`Mutation`] routed through
//! the history's tracked entry point, so each operation is exactly one undo
//! step and nothing edits the document behind the history's back.
//!
//! Operations addressing an unknown block are no-ops: the document and the
//! history are left alone and the caller gets `None`.

use crate::errors::PersistError;
use crate::history::{SetStateOptions, DEFAULT_CAPACITY};
use crate::mutations::{Mutation, MutationError};
use crate::persistence::{HistoryStore, MemoryHistoryStore, PersistentHistory};
use pagesmith_common::{
    BlockId, BlockIdGenerator, BlockStyle, BlockType, ContentBlock, DesignTokens,
    HistorySnapshot, Props, QrAssociation, UtmParams,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct ContentTree {
    history: PersistentHistory<HistorySnapshot>,
    /// Lives outside the snapshots so undo never hands out an id twice
    ids: BlockIdGenerator,
    selected: Option<BlockId>,
}

impl ContentTree {
    /// Open the tree for `document_key`, restoring its persisted history
    pub fn open(
        document_key: &str,
        initial: HistorySnapshot,
        capacity: usize,
        store: Arc<dyn HistoryStore>,
    ) -> Self {
        let history = PersistentHistory::restore(document_key, initial, capacity, store);
        let mut ids = BlockIdGenerator::new(document_key);

        let state = history.history().to_state();
        for snapshot in state.past.iter().chain([&state.present]).chain(&state.future) {
            ids.resume_after(snapshot.block_ids());
        }

        Self {
            history,
            ids,
            selected: None,
        }
    }

    /// Unpersisted tree with the default capacity
    pub fn in_memory(document_key: &str, initial: HistorySnapshot) -> Self {
        Self::open(
            document_key,
            initial,
            DEFAULT_CAPACITY,
            Arc::new(MemoryHistoryStore::new()),
        )
    }

    pub fn snapshot(&self) -> &HistorySnapshot {
        self.history.present()
    }

    pub fn blocks(&self) -> &[Arc<ContentBlock>] {
        &self.snapshot().content_blocks
    }

    pub fn design_tokens(&self) -> &DesignTokens {
        &self.snapshot().design_tokens
    }

    pub fn is_empty(&self) -> bool {
        self.blocks().is_empty()
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, id: Option<&BlockId>) -> bool {
        match id {
            Some(id) if self.snapshot().find_block(id).is_none() => false,
            _ => {
                self.selected = id.cloned();
                true
            }
        }
    }

    /// Tracked entry point shared by every author operation
    pub fn dispatch(&mut self, mutation: Mutation) -> Result<(), MutationError> {
        let next = mutation.apply(self.history.present())?;
        debug!(mutation = mutation.name(), "Applied mutation");
        self.history.set_state(next, SetStateOptions::default());
        Ok(())
    }

    fn dispatch_quietly(&mut self, mutation: Mutation) -> bool {
        let name = mutation.name();
        match self.dispatch(mutation) {
            Ok(()) => true,
            Err(error) => {
                debug!(mutation = name, %error, "Mutation skipped");
                false
            }
        }
    }

    /// Append a block with registry defaults; it becomes the selection
    pub fn add_block(&mut self, block_type: BlockType) -> BlockId {
        let id = self.ids.new_id();
        let block = ContentBlock::new(
            id.clone(),
            block_type,
            pagesmith_evaluator::default_props(block_type),
        );
        // Fresh ids never collide, so the insert always applies
        self.dispatch_quietly(Mutation::AddBlock { block, index: None });
        self.selected = Some(id.clone());
        id
    }

    pub fn remove_block(&mut self, id: &BlockId) -> Option<BlockId> {
        if !self.dispatch_quietly(Mutation::RemoveBlock { id: id.clone() }) {
            return None;
        }
        self.reconcile_selection();
        Some(id.clone())
    }

    /// Shallow merge of `partial` into the block's props
    pub fn update_props(&mut self, id: &BlockId, partial: Props) -> Option<BlockId> {
        self.dispatch_quietly(Mutation::UpdateProps {
            id: id.clone(),
            props: partial,
        })
        .then(|| id.clone())
    }

    /// Shallow merge of the set fields of `partial` into the block's style
    pub fn update_style(&mut self, id: &BlockId, partial: BlockStyle) -> Option<BlockId> {
        self.dispatch_quietly(Mutation::UpdateStyle {
            id: id.clone(),
            style: partial,
        })
        .then(|| id.clone())
    }

    /// Move `source` directly before `target`, or to the end
    pub fn reorder(&mut self, source: &BlockId, target: Option<&BlockId>) -> Option<BlockId> {
        self.dispatch_quietly(Mutation::Reorder {
            source: source.clone(),
            target: target.cloned(),
        })
        .then(|| source.clone())
    }

    pub fn duplicate_block(&mut self, id: &BlockId) -> Option<BlockId> {
        if self.snapshot().find_block(id).is_none() {
            return None;
        }
        let new_id = self.ids.new_id();
        if !self.dispatch_quietly(Mutation::DuplicateBlock {
            source: id.clone(),
            new_id: new_id.clone(),
        }) {
            return None;
        }
        self.selected = Some(new_id.clone());
        Some(new_id)
    }

    pub fn set_design_tokens(&mut self, tokens: DesignTokens) -> bool {
        self.dispatch_quietly(Mutation::SetDesignTokens { tokens })
    }

    pub fn update_design_tokens(&mut self, edit: impl FnOnce(&mut DesignTokens)) -> bool {
        let mut tokens = self.design_tokens().clone();
        edit(&mut tokens);
        self.set_design_tokens(tokens)
    }

    /// Store `slug` as typed; rejected while the slug is locked
    pub fn set_slug(&mut self, slug: &str) -> bool {
        self.dispatch_quietly(Mutation::SetSlug {
            slug: slug.to_string(),
        })
    }

    pub fn set_locked(&mut self, locked: bool) -> bool {
        self.dispatch_quietly(Mutation::SetLocked { locked })
    }

    pub fn update_link_fields(
        &mut self,
        campaign: Option<String>,
        folder: Option<String>,
        utm: Option<UtmParams>,
    ) -> bool {
        self.dispatch_quietly(Mutation::UpdateLinkFields {
            campaign,
            folder,
            utm,
        })
    }

    pub fn attach_qr(&mut self, qr: Option<QrAssociation>) -> bool {
        self.dispatch_quietly(Mutation::AttachQr { qr })
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            debug!("Undo");
            self.reconcile_selection();
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            debug!("Redo");
            self.reconcile_selection();
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Group the following operations into one undo step
    pub fn begin_batch(&mut self) {
        self.history.begin_batch();
    }

    pub fn end_batch(&mut self) -> bool {
        self.history.end_batch()
    }

    /// Replace the document without an undo step, e.g. after loading
    pub fn hydrate(&mut self, snapshot: HistorySnapshot) {
        self.ids.resume_after(snapshot.block_ids());
        self.history.set_state(snapshot, SetStateOptions::skip_history());
        self.reconcile_selection();
    }

    pub fn flush_history(&self) -> Result<(), PersistError> {
        self.history.flush()
    }

    pub fn history_key(&self) -> &str {
        self.history.key()
    }

    /// Persist the undo stack under a new document key from now on
    pub fn rekey_history(&mut self, document_key: &str) -> Result<(), PersistError> {
        self.history.rekey(document_key)
    }

    fn reconcile_selection(&mut self) {
        let stale = self
            .selected
            .as_ref()
            .is_some_and(|id| self.snapshot().find_block(id).is_none());
        if stale {
            self.selected = None;
        }
    }
}
