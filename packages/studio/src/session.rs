//! # Studio Session
//!
//! One open page in the studio. Owns the page document, the content tree
//! that edits its history-tracked parts, both field validators and the
//! publish controller.
//!
//! Page settings (name, kind, product) and the publish status live outside
//! undo/redo; blocks, tokens and link metadata live in the tree.

use crate::collaborators::{LinkShortener, QrAssetService};
use crate::config::StudioConfig;
use crate::error::{PublishError, ServiceError, StoreError, StudioError};
use crate::publish::PublishController;
use crate::store::PageStore;
use crate::validator::{AsyncValidator, AvailabilityState, ValidatedField};
use chrono::Utc;
use pagesmith_common::{
    sanitize_slug, BlockId, BlockStyle, BlockType, ContentBlock, DesignTokens, PageDocument,
    PageId, PageKind, PageStatus, Props, QrAssociation, QrCustomization, UtmParams,
};
use pagesmith_editor::{ContentTree, ScrollArbiter};
use pagesmith_evaluator::{render_page, RenderSurface, RenderedPage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub struct StudioSession {
    config: StudioConfig,
    store: Arc<dyn PageStore>,
    qr_service: Option<Arc<dyn QrAssetService>>,
    shortener: Option<Arc<dyn LinkShortener>>,
    /// Stored form; its tracked parts are refreshed from the tree on read
    document: PageDocument,
    tree: ContentTree,
    slug_validator: AsyncValidator,
    name_validator: AsyncValidator,
    publisher: Arc<PublishController>,
    scroll: ScrollArbiter,
}

impl std::fmt::Debug for StudioSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioSession")
            .field("page_id", &self.document.id)
            .field("status", &self.document.status)
            .field("blocks", &self.tree.blocks().len())
            .finish_non_exhaustive()
    }
}

static DRAFT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Stored pages share history by id; every unsaved page gets its own key
fn history_key(id: Option<&PageId>) -> String {
    match id {
        Some(id) => format!("page://{}", id),
        None => format!(
            "draft://{}-{}-{}",
            Utc::now().timestamp_micros(),
            std::process::id(),
            DRAFT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        ),
    }
}

impl StudioSession {
    /// Edit `document` as given; nothing is read from the store
    pub fn from_document(
        config: StudioConfig,
        store: Arc<dyn PageStore>,
        document: PageDocument,
    ) -> Self {
        let snapshot = document.snapshot();
        let mut tree = ContentTree::open(
            &history_key(document.id.as_ref()),
            snapshot.clone(),
            config.history_capacity,
            config.history_store(),
        );
        // the store is authoritative for the present; the restored stacks stay
        tree.hydrate(snapshot);

        let slug_validator =
            AsyncValidator::new(ValidatedField::Slug, store.clone(), config.debounce());
        let name_validator =
            AsyncValidator::new(ValidatedField::PageName, store.clone(), config.debounce());
        slug_validator.set_exclude(document.id.clone());
        name_validator.set_exclude(document.id.clone());

        let publisher = Arc::new(PublishController::new(
            store.clone(),
            config.published_base_url.clone(),
        ));

        Self {
            config,
            store,
            qr_service: None,
            shortener: None,
            document,
            tree,
            slug_validator,
            name_validator,
            publisher,
            scroll: ScrollArbiter::default(),
        }
    }

    /// Open a stored page, or a blank landing page when `id` is `None`
    #[instrument(skip(config, store))]
    pub async fn open(
        config: StudioConfig,
        store: Arc<dyn PageStore>,
        id: Option<&PageId>,
    ) -> Result<Self, StudioError> {
        let document = match id {
            Some(id) => store
                .load_by_id(id)
                .await?
                .ok_or_else(|| StoreError::NotFound(id.clone()))?,
            None => PageDocument::default(),
        };
        debug!(blocks = document.content_blocks.len(), "Opened page");
        Ok(Self::from_document(config, store, document))
    }

    /// Open the product page for `product_id`, starting one if none exists
    #[instrument(skip(config, store))]
    pub async fn open_for_product(
        config: StudioConfig,
        store: Arc<dyn PageStore>,
        product_id: &str,
    ) -> Result<Self, StudioError> {
        let existing = store
            .load_by_product_and_kind(product_id, PageKind::Product, None)
            .await?;
        let document = existing.unwrap_or_else(|| {
            let mut document = PageDocument::default();
            document.page_settings.kind = PageKind::Product;
            document.page_settings.product_id = Some(product_id.to_string());
            document
        });
        Ok(Self::from_document(config, store, document))
    }

    pub fn with_qr_service(mut self, service: Arc<dyn QrAssetService>) -> Self {
        self.qr_service = Some(service);
        self
    }

    pub fn with_shortener(mut self, shortener: Arc<dyn LinkShortener>) -> Self {
        self.shortener = Some(shortener);
        self
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn page_id(&self) -> Option<&PageId> {
        self.document.id.as_ref()
    }

    pub fn status(&self) -> PageStatus {
        self.document.status
    }

    /// The document as it would be saved right now
    pub fn current_document(&self) -> PageDocument {
        let mut document = self.document.clone();
        document.apply_snapshot(self.tree.snapshot());
        document
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ContentTree {
        &mut self.tree
    }

    pub fn scroll(&mut self) -> &mut ScrollArbiter {
        &mut self.scroll
    }

    pub fn publisher(&self) -> Arc<PublishController> {
        self.publisher.clone()
    }

    pub fn slug_validator(&self) -> &AsyncValidator {
        &self.slug_validator
    }

    pub fn name_validator(&self) -> &AsyncValidator {
        &self.name_validator
    }

    pub fn slug_state(&self) -> AvailabilityState {
        self.slug_validator.state()
    }

    pub fn name_state(&self) -> AvailabilityState {
        self.name_validator.state()
    }

    // Content editing

    pub fn add_block(&mut self, block_type: BlockType) -> BlockId {
        self.tree.add_block(block_type)
    }

    pub fn remove_block(&mut self, id: &BlockId) -> Option<BlockId> {
        self.tree.remove_block(id)
    }

    pub fn update_props(&mut self, id: &BlockId, partial: Props) -> Option<BlockId> {
        self.tree.update_props(id, partial)
    }

    pub fn update_style(&mut self, id: &BlockId, partial: BlockStyle) -> Option<BlockId> {
        self.tree.update_style(id, partial)
    }

    pub fn reorder(&mut self, source: &BlockId, target: Option<&BlockId>) -> Option<BlockId> {
        self.tree.reorder(source, target)
    }

    pub fn duplicate_block(&mut self, id: &BlockId) -> Option<BlockId> {
        self.tree.duplicate_block(id)
    }

    pub fn update_design_tokens(&mut self, edit: impl FnOnce(&mut DesignTokens)) -> bool {
        self.tree.update_design_tokens(edit)
    }

    pub fn undo(&mut self) -> bool {
        self.after_history_move(|tree| tree.undo())
    }

    pub fn redo(&mut self) -> bool {
        self.after_history_move(|tree| tree.redo())
    }

    /// Undo and redo can change the slug under the validator
    fn after_history_move(&mut self, step: impl FnOnce(&mut ContentTree) -> bool) -> bool {
        let before = self.tree.snapshot().link_metadata.slug.clone();
        let moved = step(&mut self.tree);
        let after = &self.tree.snapshot().link_metadata.slug;
        if moved && *after != before {
            let after = after.clone();
            self.revalidate_slug(&after);
        }
        moved
    }

    // Link and page settings

    /// Record the slug as typed (sanitized) and schedule an availability check
    pub fn set_slug(&mut self, raw: &str) -> bool {
        let slug = sanitize_slug(raw);
        if !self.tree.set_slug(&slug) {
            return false;
        }
        self.revalidate_slug(&slug);
        true
    }

    fn revalidate_slug(&self, slug: &str) {
        if slug.is_empty() {
            self.slug_validator.cancel();
        } else {
            self.slug_validator.schedule(slug);
        }
    }

    pub fn set_slug_locked(&mut self, locked: bool) -> bool {
        self.tree.set_locked(locked)
    }

    pub fn update_link_fields(
        &mut self,
        campaign: Option<String>,
        folder: Option<String>,
        utm: Option<UtmParams>,
    ) -> bool {
        self.tree.update_link_fields(campaign, folder, utm)
    }

    pub fn set_page_name(&mut self, raw: &str) {
        self.document.page_settings.page_name = raw.to_string();
        self.revalidate_name();
    }

    pub fn set_kind(&mut self, kind: PageKind) {
        self.document.page_settings.kind = kind;
        self.revalidate_name();
    }

    pub fn set_product_id(&mut self, product_id: Option<String>) {
        self.document.page_settings.product_id = product_id;
    }

    fn revalidate_name(&self) {
        let settings = &self.document.page_settings;
        if settings.kind.requires_unique_name() {
            self.name_validator.schedule(&settings.page_name);
        } else {
            self.name_validator.cancel();
        }
    }

    pub fn render(&self, surface: RenderSurface) -> RenderedPage {
        let blocks: Vec<ContentBlock> = self
            .tree
            .blocks()
            .iter()
            .map(|block| ContentBlock::clone(block))
            .collect();
        render_page(&blocks, self.tree.design_tokens(), surface)
    }

    // Persistence

    /// Let pending checks finish; fields never checked are checked now
    async fn settle_validation(&self) {
        let slug = self.tree.snapshot().link_metadata.slug.clone();
        refresh(&self.slug_validator, &slug).await;

        let settings = &self.document.page_settings;
        if settings.kind.requires_unique_name() {
            refresh(&self.name_validator, &settings.page_name).await;
        }
    }

    /// Publish or republish the page.
    ///
    /// On failure the status returns to what it was before the attempt.
    #[instrument(skip(self), fields(page_id = ?self.document.id))]
    pub async fn publish(&mut self) -> Result<&PageDocument, PublishError> {
        self.settle_validation().await;

        let prior = self.document.status;
        self.document.status = PageStatus::Publishing;
        let candidate = self.current_document();

        let result = self
            .publisher
            .publish(&candidate, &self.slug_validator, &self.name_validator)
            .await;
        match result {
            Ok(published) => {
                self.adopt(published);
                Ok(&self.document)
            }
            Err(error) => {
                self.document.status = prior;
                warn!(%error, status = ?prior, "Publish failed");
                Err(error)
            }
        }
    }

    #[instrument(skip(self), fields(page_id = ?self.document.id))]
    pub async fn save_draft(&mut self) -> Result<&PageDocument, PublishError> {
        self.slug_validator.settle().await;
        self.name_validator.settle().await;

        let saved = self
            .publisher
            .save_draft(&self.current_document(), &self.slug_validator, &self.name_validator)
            .await?;
        self.adopt(saved);
        Ok(&self.document)
    }

    fn adopt(&mut self, stored: PageDocument) {
        self.slug_validator.set_exclude(stored.id.clone());
        self.name_validator.set_exclude(stored.id.clone());
        if stored.id != self.document.id {
            self.move_history(history_key(stored.id.as_ref()));
        }
        self.document = stored;
    }

    /// Follow the document's identity; editing goes on if the move fails
    fn move_history(&mut self, key: String) {
        if let Err(error) = self.tree.rekey_history(&key) {
            warn!(%error, key = %key, "Could not move undo history");
        }
    }

    /// Generate QR images for the published address and attach them.
    ///
    /// Dynamic codes encode a short link; when shortening fails the code
    /// falls back to the long URL.
    #[instrument(skip(self, customization))]
    pub async fn generate_qr(
        &mut self,
        customization: QrCustomization,
        dynamic: bool,
    ) -> Result<QrAssociation, StudioError> {
        let service = self
            .qr_service
            .clone()
            .ok_or_else(|| ServiceError::Unavailable("no QR service configured".to_string()))?;

        let link = self.tree.snapshot().link_metadata.clone();
        if link.slug.is_empty() {
            return Err(ServiceError::Rejected("a slug is required for QR codes".to_string()).into());
        }
        let long_url = with_query(&self.config.published_url(&link.slug), &link.utm)
            .map_err(|error| ServiceError::Rejected(format!("invalid page URL: {}", error)))?
            .to_string();

        let mut association = QrAssociation {
            destination: long_url.clone(),
            is_dynamic: false,
            short_code: None,
            customization,
            images: Vec::new(),
        };
        if dynamic {
            match &self.shortener {
                Some(shortener) => match shortener.create(&long_url).await {
                    Ok(short) => {
                        association.destination = short.short_url;
                        association.short_code = Some(short.short_code);
                        association.is_dynamic = true;
                    }
                    Err(error) => warn!(%error, "Shortening failed, using the long URL"),
                },
                None => warn!("No shortener configured, using the long URL"),
            }
        }

        association.images = service
            .generate(&association.destination, &association.customization)
            .await?;
        self.tree.attach_qr(Some(association.clone()));
        info!(destination = %association.destination, "Attached QR code");
        Ok(association)
    }

    /// Delete the stored page; the session keeps the content as a new draft
    pub async fn delete(&mut self) -> Result<(), StudioError> {
        let id = self.document.id.take().ok_or(StudioError::Unsaved)?;
        if let Err(error) = self.store.delete(&id).await {
            self.document.id = Some(id);
            return Err(error.into());
        }
        self.document.status = PageStatus::Draft;
        self.document.publish_info = Default::default();
        self.slug_validator.set_exclude(None);
        self.name_validator.set_exclude(None);
        self.move_history(history_key(None));
        info!(page_id = %id, "Deleted page");
        Ok(())
    }

    /// Stop pending checks and flush the undo history
    pub fn close(self) -> Result<(), StudioError> {
        self.slug_validator.cancel();
        self.name_validator.cancel();
        self.tree.flush_history()?;
        Ok(())
    }
}

async fn refresh(validator: &AsyncValidator, value: &str) {
    let state = validator.settle().await;
    if state == AvailabilityState::default() && !value.trim().is_empty() {
        validator.validate(value).await;
    }
}

/// Published address with the UTM fields as query parameters
fn with_query(base: &str, utm: &UtmParams) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    let pairs = utm.query_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}
