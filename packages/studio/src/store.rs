//! # Page Store
//!
//! Interface to the external record store holding page documents, plus an
//! in-memory implementation used by the CLI and the tests.

use crate::error::StoreError;
use async_trait::async_trait;
use pagesmith_common::{PageDocument, PageId, PageKind, PageStatus};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// External page persistence.
///
/// Implementations are free to be remote; every call is a suspension point.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Insert (`id == None`) or overwrite a page; returns its id
    async fn save(&self, id: Option<&PageId>, document: &PageDocument)
        -> Result<PageId, StoreError>;

    async fn load_by_id(&self, id: &PageId) -> Result<Option<PageDocument>, StoreError>;

    async fn load_by_product_and_kind(
        &self,
        product_id: &str,
        kind: PageKind,
        status: Option<PageStatus>,
    ) -> Result<Option<PageDocument>, StoreError>;

    /// Published pages only
    async fn load_by_slug(&self, slug: &str) -> Result<Option<PageDocument>, StoreError>;

    /// Whether any draft or published page other than `exclude` uses `slug`
    async fn check_slug_exists(
        &self,
        slug: &str,
        exclude: Option<&PageId>,
    ) -> Result<bool, StoreError>;

    /// Whether any landing page other than `exclude` is called `name`
    async fn check_name_exists(
        &self,
        name: &str,
        exclude: Option<&PageId>,
    ) -> Result<bool, StoreError>;

    async fn delete(&self, id: &PageId) -> Result<(), StoreError>;

    async fn increment_views(&self, id: &PageId) -> Result<(), StoreError>;
}

/// Pages held in memory, keyed by id
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    pages: RwLock<BTreeMap<PageId, PageDocument>>,
}

fn poisoned() -> StoreError {
    StoreError::Transport("page store lock poisoned".to_string())
}

fn same_name(a: &str, b: &str) -> bool {
    pagesmith_common::normalize_name(a).to_lowercase()
        == pagesmith_common::normalize_name(b).to_lowercase()
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a page dump; pages without an id get one
    pub fn from_pages(pages: impl IntoIterator<Item = PageDocument>) -> Self {
        let mut map = BTreeMap::new();
        for mut page in pages {
            let id = match page.id.clone() {
                Some(id) => id,
                None => next_id(&map),
            };
            page.id = Some(id.clone());
            map.insert(id, page);
        }
        Self {
            pages: RwLock::new(map),
        }
    }

    /// Every stored page, ordered by id
    pub fn pages(&self) -> Result<Vec<PageDocument>, StoreError> {
        Ok(self.read()?.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.read().map(|pages| pages.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<PageId, PageDocument>>, StoreError> {
        self.pages.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<PageId, PageDocument>>, StoreError> {
        self.pages.write().map_err(|_| poisoned())
    }
}

fn next_id(pages: &BTreeMap<PageId, PageDocument>) -> PageId {
    (pages.len() + 1..)
        .map(|n| PageId::new(format!("page-{}", n)))
        .find(|id| !pages.contains_key(id))
        .unwrap_or_else(|| PageId::new("page-0"))
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn save(
        &self,
        id: Option<&PageId>,
        document: &PageDocument,
    ) -> Result<PageId, StoreError> {
        let mut pages = self.write()?;
        let id = match id {
            Some(id) => id.clone(),
            None => next_id(&pages),
        };

        let mut stored = document.clone();
        stored.id = Some(id.clone());
        pages.insert(id.clone(), stored);
        debug!(page_id = %id, "Saved page");
        Ok(id)
    }

    async fn load_by_id(&self, id: &PageId) -> Result<Option<PageDocument>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn load_by_product_and_kind(
        &self,
        product_id: &str,
        kind: PageKind,
        status: Option<PageStatus>,
    ) -> Result<Option<PageDocument>, StoreError> {
        Ok(self
            .read()?
            .values()
            .find(|page| {
                page.page_settings.kind == kind
                    && page.page_settings.product_id.as_deref() == Some(product_id)
                    && status.map_or(true, |status| page.status == status)
            })
            .cloned())
    }

    async fn load_by_slug(&self, slug: &str) -> Result<Option<PageDocument>, StoreError> {
        Ok(self
            .read()?
            .values()
            .find(|page| page.status == PageStatus::Published && page.link_metadata.slug == slug)
            .cloned())
    }

    async fn check_slug_exists(
        &self,
        slug: &str,
        exclude: Option<&PageId>,
    ) -> Result<bool, StoreError> {
        Ok(self.read()?.iter().any(|(id, page)| {
            Some(id) != exclude && !slug.is_empty() && page.link_metadata.slug == slug
        }))
    }

    async fn check_name_exists(
        &self,
        name: &str,
        exclude: Option<&PageId>,
    ) -> Result<bool, StoreError> {
        Ok(self.read()?.iter().any(|(id, page)| {
            Some(id) != exclude
                && page.page_settings.kind == PageKind::Landing
                && same_name(&page.page_settings.page_name, name)
        }))
    }

    async fn delete(&self, id: &PageId) -> Result<(), StoreError> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn increment_views(&self, id: &PageId) -> Result<(), StoreError> {
        let mut pages = self.write()?;
        let page = pages
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        page.publish_info.view_count += 1;
        Ok(())
    }
}
