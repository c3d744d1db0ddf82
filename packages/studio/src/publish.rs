//! # Publish Lifecycle
//!
//! ```text
//! draft ──▶ publishing ──ok──▶ published ──▶ publishing ──ok──▶ published
//!               │                                 │
//!               └──err──▶ draft                   └──err──▶ published
//! ```
//!
//! The controller owns the guards and the single store write. Status
//! transitions on the live document belong to the session, which restores
//! the prior status when the controller returns an error.

use crate::error::{GuardViolation, PublishError};
use crate::store::PageStore;
use crate::validator::{AsyncValidator, AvailabilityState};
use chrono::Utc;
use pagesmith_common::{
    check_name_format, check_slug_format, normalize_name, sanitize_slug, PageDocument, PageKind,
    PageStatus,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Held for the duration of one publish or save
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PublishController {
    store: Arc<dyn PageStore>,
    base_url: String,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for PublishController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishController")
            .field("base_url", &self.base_url)
            .field("in_flight", &self.is_in_flight())
            .finish_non_exhaustive()
    }
}

impl PublishController {
    pub fn new(store: Arc<dyn PageStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn published_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), slug)
    }

    /// Guards that need no I/O: required fields and current validator verdicts
    pub fn publish_violations(
        &self,
        document: &PageDocument,
        slug: &AvailabilityState,
        name: &AvailabilityState,
    ) -> Vec<GuardViolation> {
        let mut violations = required_field_violations(document);

        if document.page_settings.kind.requires_unique_name() && !name.is_available() {
            violations.push(GuardViolation::NameNotAvailable);
        }

        match check_slug_format(&sanitize_slug(&document.link_metadata.slug)) {
            Err(error) => violations.push(GuardViolation::InvalidSlug(error)),
            Ok(()) if !slug.is_available() => violations.push(GuardViolation::SlugNotAvailable),
            Ok(()) => {}
        }

        if document.content_blocks.is_empty() {
            violations.push(GuardViolation::EmptyCanvas);
        }
        violations
    }

    /// Publish `document`, returning it as stored.
    ///
    /// Exactly one store write happens, and only when every guard and the
    /// final availability re-check pass.
    #[instrument(skip_all, fields(page_id = ?document.id, slug = %document.link_metadata.slug))]
    pub async fn publish(
        &self,
        document: &PageDocument,
        slug_validator: &AsyncValidator,
        name_validator: &AsyncValidator,
    ) -> Result<PageDocument, PublishError> {
        let _flight = InFlight::acquire(&self.in_flight).ok_or(PublishError::InFlight)?;

        let violations =
            self.publish_violations(document, &slug_validator.state(), &name_validator.state());
        if !violations.is_empty() {
            info!(count = violations.len(), "Publish blocked by guards");
            return Err(PublishError::Blocked(violations));
        }

        let slug = sanitize_slug(&document.link_metadata.slug);
        let violations = final_recheck(document, Some(&slug), slug_validator, name_validator).await?;
        if !violations.is_empty() {
            info!(count = violations.len(), "Publish blocked by final re-check");
            return Err(PublishError::Blocked(violations));
        }

        let mut published = document.clone();
        published.link_metadata.slug = slug.clone();
        published.sync_slug_mirror();
        published.status = PageStatus::Published;
        published.publish_info.published_url = Some(self.published_url(&slug));
        published.publish_info.published_at = Some(Utc::now());
        published.publish_info.view_count = self.stored_view_count(document).await?;

        let id = self.store.save(document.id.as_ref(), &published).await?;
        published.id = Some(id.clone());
        info!(page_id = %id, url = ?published.publish_info.published_url, "Published page");
        Ok(published)
    }

    /// Save without publishing. Slug checks apply only when a slug was entered.
    #[instrument(skip_all, fields(page_id = ?document.id))]
    pub async fn save_draft(
        &self,
        document: &PageDocument,
        slug_validator: &AsyncValidator,
        name_validator: &AsyncValidator,
    ) -> Result<PageDocument, PublishError> {
        let _flight = InFlight::acquire(&self.in_flight).ok_or(PublishError::InFlight)?;

        let mut violations = required_field_violations(document);
        if document.status == PageStatus::Published {
            violations.push(GuardViolation::PageIsLive);
        }
        let slug = sanitize_slug(&document.link_metadata.slug);
        let has_slug = !slug.is_empty();
        if has_slug {
            if let Err(error) = check_slug_format(&slug) {
                violations.push(GuardViolation::InvalidSlug(error));
            }
        }
        if !violations.is_empty() {
            info!(count = violations.len(), "Draft save blocked by guards");
            return Err(PublishError::Blocked(violations));
        }

        let violations = final_recheck(
            document,
            has_slug.then_some(slug.as_str()),
            slug_validator,
            name_validator,
        )
        .await?;
        if !violations.is_empty() {
            info!(count = violations.len(), "Draft save blocked by final re-check");
            return Err(PublishError::Blocked(violations));
        }

        let mut draft = document.clone();
        draft.link_metadata.slug = slug;
        draft.sync_slug_mirror();
        draft.status = PageStatus::Draft;
        draft.publish_info.view_count = self.stored_view_count(document).await?;

        let id = self.store.save(document.id.as_ref(), &draft).await?;
        draft.id = Some(id.clone());
        info!(page_id = %id, "Saved draft");
        Ok(draft)
    }

    /// Views are counted by the store; the copy in an open session goes stale
    async fn stored_view_count(&self, document: &PageDocument) -> Result<u64, PublishError> {
        let cached = document.publish_info.view_count;
        let Some(id) = &document.id else {
            return Ok(cached);
        };
        Ok(self
            .store
            .load_by_id(id)
            .await?
            .map_or(cached, |stored| stored.publish_info.view_count))
    }
}

fn required_field_violations(document: &PageDocument) -> Vec<GuardViolation> {
    let mut violations = Vec::new();
    let settings = &document.page_settings;

    if let Err(error) = check_name_format(&normalize_name(&settings.page_name)) {
        violations.push(GuardViolation::InvalidPageName(error));
    }
    let has_product = settings
        .product_id
        .as_deref()
        .is_some_and(|product| !product.trim().is_empty());
    if settings.kind == PageKind::Product && !has_product {
        violations.push(GuardViolation::MissingProduct);
    }
    violations
}

/// Undebounced collision checks; transport errors abort the operation
async fn final_recheck(
    document: &PageDocument,
    slug: Option<&str>,
    slug_validator: &AsyncValidator,
    name_validator: &AsyncValidator,
) -> Result<Vec<GuardViolation>, PublishError> {
    let mut violations = Vec::new();

    if let Some(slug) = slug {
        if !slug_validator.confirm(slug).await?.is_available() {
            violations.push(GuardViolation::SlugTaken);
        }
    }
    if document.page_settings.kind.requires_unique_name() {
        let name = &document.page_settings.page_name;
        match name_validator.confirm(name).await {
            Ok(state) if !state.is_available() => violations.push(GuardViolation::NameTaken),
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "Page name re-check failed");
                return Err(error.into());
            }
        }
    }
    Ok(violations)
}
