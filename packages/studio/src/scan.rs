//! Resolves a scanned QR code or short link to the published page behind it.

use crate::collaborators::LinkShortener;
use crate::error::ScanError;
use crate::store::PageStore;
use pagesmith_common::{PageDocument, PageId, PageStatus};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanTarget {
    pub page_id: PageId,
    pub page: PageDocument,
    pub redirect_url: String,
}

pub struct ScanResolver {
    store: Arc<dyn PageStore>,
    shortener: Option<Arc<dyn LinkShortener>>,
    base_url: String,
}

impl ScanResolver {
    pub fn new(store: Arc<dyn PageStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            shortener: None,
            base_url: base_url.into(),
        }
    }

    pub fn with_shortener(mut self, shortener: Arc<dyn LinkShortener>) -> Self {
        self.shortener = Some(shortener);
        self
    }

    /// Slug a code stands for: the last path segment of the shortener's
    /// long URL, or the code itself when no shortener knows it
    async fn slug_for(&self, code: &str) -> String {
        let Some(shortener) = &self.shortener else {
            return code.to_string();
        };

        match shortener.resolve(code).await {
            Ok(Some(long_url)) => match Url::parse(&long_url) {
                Ok(url) => url
                    .path_segments()
                    .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                    .map_or_else(|| code.to_string(), str::to_string),
                Err(error) => {
                    warn!(%error, code, "Shortener returned an invalid URL");
                    code.to_string()
                }
            },
            Ok(None) => code.to_string(),
            Err(error) => {
                warn!(%error, code, "Shortener lookup failed, treating code as slug");
                code.to_string()
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, code: &str) -> Result<ScanTarget, ScanError> {
        let code = code.trim().trim_matches('/');
        if code.is_empty() {
            return Err(ScanError::NotFound(String::new()));
        }

        let slug = self.slug_for(code).await;
        debug!(slug = %slug, "Resolved scan code");

        let page = match self.store.load_by_slug(&slug).await? {
            Some(page) if page.status == PageStatus::Published => page,
            _ => {
                info!(code, "Scan target not found");
                return Err(ScanError::NotFound(code.to_string()));
            }
        };
        let Some(page_id) = page.id.clone() else {
            return Err(ScanError::NotFound(code.to_string()));
        };

        if let Err(error) = self.store.increment_views(&page_id).await {
            warn!(%error, page_id = %page_id, "Failed to record page view");
        }

        let redirect_url = page
            .publish_info
            .published_url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", self.base_url.trim_end_matches('/'), slug));
        info!(page_id = %page_id, url = %redirect_url, "Scan resolved");
        Ok(ScanTarget {
            page_id,
            page,
            redirect_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MemoryLinkShortener;
    use crate::store::MemoryPageStore;
    use pagesmith_common::LinkMetadata;

    fn published(slug: &str) -> PageDocument {
        PageDocument {
            link_metadata: LinkMetadata {
                slug: slug.to_string(),
                ..Default::default()
            },
            status: PageStatus::Published,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_raw_slug_resolves_and_counts_view() {
        let store = Arc::new(MemoryPageStore::from_pages([published("spring-menu")]));
        let resolver = ScanResolver::new(store.clone(), "https://x.test");

        let target = resolver.resolve("spring-menu").await.unwrap();
        assert_eq!(target.redirect_url, "https://x.test/spring-menu");

        let page = store.load_by_id(&target.page_id).await.unwrap().unwrap();
        assert_eq!(page.publish_info.view_count, 1);
    }

    #[tokio::test]
    async fn test_short_code_goes_through_shortener() {
        let store = Arc::new(MemoryPageStore::from_pages([published("spring-menu")]));
        let shortener = Arc::new(MemoryLinkShortener::new("https://s.test"));
        let link = shortener
            .create("https://x.test/spring-menu?utm_source=qr")
            .await
            .unwrap();

        let resolver = ScanResolver::new(store, "https://x.test").with_shortener(shortener);
        let target = resolver.resolve(&link.short_code).await.unwrap();
        assert_eq!(target.page.link_metadata.slug, "spring-menu");
    }

    #[tokio::test]
    async fn test_long_url_slug_ignores_trailing_slash_and_fragment() {
        let store = Arc::new(MemoryPageStore::from_pages([published("spring-menu")]));
        let shortener = Arc::new(MemoryLinkShortener::new("https://s.test"));
        let link = shortener
            .create("https://x.test/pages/spring-menu/?utm_campaign=a%2Fb#top")
            .await
            .unwrap();

        let resolver = ScanResolver::new(store, "https://x.test").with_shortener(shortener);
        let target = resolver.resolve(&link.short_code).await.unwrap();
        assert_eq!(target.page.link_metadata.slug, "spring-menu");
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let resolver = ScanResolver::new(Arc::new(MemoryPageStore::new()), "https://x.test");
        assert!(matches!(
            resolver.resolve("missing").await,
            Err(ScanError::NotFound(code)) if code == "missing"
        ));
    }
}
