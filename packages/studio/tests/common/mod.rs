//! Shared fixtures for the studio integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use pagesmith_common::{
    BlockId, BlockType, ContentBlock, PageDocument, PageId, PageKind, PageStatus, Props,
};
use pagesmith_studio::{MemoryPageStore, PageStore, StoreError, StudioConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

/// Memory store with call counters, per-slug latency, a save gate and
/// switchable transport failures
#[derive(Default)]
pub struct GatedStore {
    pub inner: MemoryPageStore,
    pub saves: AtomicUsize,
    pub slug_checks: AtomicUsize,
    pub fail_checks: AtomicBool,
    slug_latency: Mutex<HashMap<String, Duration>>,
    save_gate: Mutex<Option<std::sync::Arc<Notify>>>,
}

impl GatedStore {
    pub fn with_pages(pages: impl IntoIterator<Item = PageDocument>) -> Self {
        Self {
            inner: MemoryPageStore::from_pages(pages),
            ..Default::default()
        }
    }

    pub fn delay_slug(&self, slug: &str, latency: Duration) {
        self.slug_latency
            .lock()
            .unwrap()
            .insert(slug.to_string(), latency);
    }

    /// Saves block until the returned notify is signalled
    pub fn gate_saves(&self) -> std::sync::Arc<Notify> {
        let gate = std::sync::Arc::new(Notify::new());
        *self.save_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn slug_check_count(&self) -> usize {
        self.slug_checks.load(Ordering::SeqCst)
    }

    fn transport(&self) -> Result<(), StoreError> {
        if self.fail_checks.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PageStore for GatedStore {
    async fn save(
        &self,
        id: Option<&PageId>,
        document: &PageDocument,
    ) -> Result<PageId, StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let gate = self.save_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.inner.save(id, document).await
    }

    async fn load_by_id(&self, id: &PageId) -> Result<Option<PageDocument>, StoreError> {
        self.inner.load_by_id(id).await
    }

    async fn load_by_product_and_kind(
        &self,
        product_id: &str,
        kind: PageKind,
        status: Option<PageStatus>,
    ) -> Result<Option<PageDocument>, StoreError> {
        self.inner
            .load_by_product_and_kind(product_id, kind, status)
            .await
    }

    async fn load_by_slug(&self, slug: &str) -> Result<Option<PageDocument>, StoreError> {
        self.inner.load_by_slug(slug).await
    }

    async fn check_slug_exists(
        &self,
        slug: &str,
        exclude: Option<&PageId>,
    ) -> Result<bool, StoreError> {
        self.slug_checks.fetch_add(1, Ordering::SeqCst);
        let latency = self.slug_latency.lock().unwrap().get(slug).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.transport()?;
        self.inner.check_slug_exists(slug, exclude).await
    }

    async fn check_name_exists(
        &self,
        name: &str,
        exclude: Option<&PageId>,
    ) -> Result<bool, StoreError> {
        self.transport()?;
        self.inner.check_name_exists(name, exclude).await
    }

    async fn delete(&self, id: &PageId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }

    async fn increment_views(&self, id: &PageId) -> Result<(), StoreError> {
        self.inner.increment_views(id).await
    }
}

pub fn config() -> StudioConfig {
    StudioConfig {
        validation_debounce_ms: 500,
        ..Default::default()
    }
}

pub fn landing(name: &str, slug: &str, status: PageStatus) -> PageDocument {
    let mut page = PageDocument::default();
    page.page_settings.page_name = name.to_string();
    page.link_metadata.slug = slug.to_string();
    page.status = status;
    page.content_blocks.push(ContentBlock::new(
        BlockId::new("seed-1"),
        BlockType::Header,
        Props::new(),
    ));
    page
}
