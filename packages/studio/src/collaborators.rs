//! External services the studio talks to besides the page store.

use crate::error::ServiceError;
use async_trait::async_trait;
use crc32fast::Hasher;
use pagesmith_common::{QrCustomization, QrImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Renders QR images. The returned blobs are attached to link metadata
/// as they are.
#[async_trait]
pub trait QrAssetService: Send + Sync {
    async fn generate(
        &self,
        destination: &str,
        customization: &QrCustomization,
    ) -> Result<Vec<QrImage>, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub short_code: String,
    pub short_url: String,
}

/// URL shortener backing dynamic QR codes
#[async_trait]
pub trait LinkShortener: Send + Sync {
    async fn create(&self, long_url: &str) -> Result<ShortLink, ServiceError>;

    /// Long URL behind `short_code`, if the code is known
    async fn resolve(&self, short_code: &str) -> Result<Option<String>, ServiceError>;
}

/// Deterministic shortener: the code is the CRC32 of the long URL
#[derive(Debug)]
pub struct MemoryLinkShortener {
    base_url: String,
    links: Mutex<HashMap<String, String>>,
}

impl MemoryLinkShortener {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            links: Mutex::new(HashMap::new()),
        }
    }

    pub fn code_for(long_url: &str) -> String {
        let mut hasher = Hasher::new();
        hasher.update(long_url.as_bytes());
        format!("{:08x}", hasher.finalize())
    }

    fn links(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, ServiceError> {
        self.links
            .lock()
            .map_err(|_| ServiceError::Unavailable("shortener lock poisoned".to_string()))
    }
}

#[async_trait]
impl LinkShortener for MemoryLinkShortener {
    async fn create(&self, long_url: &str) -> Result<ShortLink, ServiceError> {
        if long_url.trim().is_empty() {
            return Err(ServiceError::Rejected("empty URL".to_string()));
        }

        let short_code = Self::code_for(long_url);
        self.links()?
            .insert(short_code.clone(), long_url.to_string());
        Ok(ShortLink {
            short_url: format!("{}/{}", self.base_url.trim_end_matches('/'), short_code),
            short_code,
        })
    }

    async fn resolve(&self, short_code: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.links()?.get(short_code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_codes_are_stable_and_resolvable() {
        let shortener = MemoryLinkShortener::new("https://s.test/");
        let link = shortener
            .create("https://pages.example.com/spring-menu")
            .await
            .unwrap();
        let again = shortener
            .create("https://pages.example.com/spring-menu")
            .await
            .unwrap();

        assert_eq!(link, again);
        assert_eq!(link.short_url, format!("https://s.test/{}", link.short_code));
        assert_eq!(
            shortener.resolve(&link.short_code).await.unwrap().as_deref(),
            Some("https://pages.example.com/spring-menu")
        );
        assert_eq!(shortener.resolve("nope").await.unwrap(), None);
    }
}
