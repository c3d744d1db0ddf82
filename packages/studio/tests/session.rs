//! Session behaviour across collaborators: QR codes, scans, history, rendering

mod common;

use async_trait::async_trait;
use common::{config, landing, GatedStore};
use pagesmith_common::{
    PageStatus, QrCustomization, QrImage, QrImageFormat, UtmParams,
};
use pagesmith_evaluator::{PublishedViewer, RenderSurface};
use pagesmith_studio::{
    AvailabilityState, LinkShortener, MemoryLinkShortener, PageStore, QrAssetService, ScanError,
    ScanResolver, ServiceError, ShortLink, StudioConfig, StudioError, StudioSession,
};
use std::sync::Arc;

struct FakeQr;

#[async_trait]
impl QrAssetService for FakeQr {
    async fn generate(
        &self,
        destination: &str,
        _customization: &QrCustomization,
    ) -> Result<Vec<QrImage>, ServiceError> {
        Ok(vec![QrImage {
            format: QrImageFormat::Svg,
            bytes: Arc::from(format!("<svg>{}</svg>", destination).into_bytes()),
        }])
    }
}

struct DownShortener;

#[async_trait]
impl LinkShortener for DownShortener {
    async fn create(&self, _long_url: &str) -> Result<ShortLink, ServiceError> {
        Err(ServiceError::Unavailable("timeout".to_string()))
    }

    async fn resolve(&self, _short_code: &str) -> Result<Option<String>, ServiceError> {
        Err(ServiceError::Unavailable("timeout".to_string()))
    }
}

fn dyn_store(store: &Arc<GatedStore>) -> Arc<dyn PageStore> {
    store.clone()
}

#[tokio::test(start_paused = true)]
async fn test_dynamic_qr_round_trips_through_scan() {
    let store = Arc::new(GatedStore::default());
    let shortener = Arc::new(MemoryLinkShortener::new("https://s.test"));
    let mut session = StudioSession::open(config(), dyn_store(&store), None)
        .await
        .unwrap()
        .with_qr_service(Arc::new(FakeQr))
        .with_shortener(shortener.clone());

    session.set_page_name("Harbour Coffee");
    session.set_slug("harbour-coffee");
    session.tree_mut().add_block(pagesmith_common::BlockType::Header);
    session.update_link_fields(
        None,
        None,
        Some(UtmParams {
            source: Some("qr".to_string()),
            ..Default::default()
        }),
    );

    let qr = session
        .generate_qr(QrCustomization::default(), true)
        .await
        .unwrap();
    assert!(qr.is_dynamic);
    let code = qr.short_code.clone().unwrap();
    assert_eq!(qr.destination, format!("https://s.test/{}", code));
    assert_eq!(qr.images.len(), 1);
    assert_eq!(
        session.current_document().link_metadata.qr.as_ref(),
        Some(&qr)
    );

    // not published yet: the scan finds nothing
    let resolver = ScanResolver::new(dyn_store(&store), "https://pages.example.com")
        .with_shortener(shortener);
    assert!(matches!(
        resolver.resolve(&code).await,
        Err(ScanError::NotFound(_))
    ));

    let published = session.publish().await.unwrap().clone();
    let target = resolver.resolve(&code).await.unwrap();
    assert_eq!(target.page_id, published.id.clone().unwrap());
    assert_eq!(
        target.redirect_url,
        "https://pages.example.com/harbour-coffee"
    );

    let stored = store.load_by_id(&target.page_id).await.unwrap().unwrap();
    assert_eq!(stored.publish_info.view_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_shortener_outage_falls_back_to_long_url() {
    let store = Arc::new(GatedStore::default());
    let mut session = StudioSession::open(config(), dyn_store(&store), None)
        .await
        .unwrap()
        .with_qr_service(Arc::new(FakeQr))
        .with_shortener(Arc::new(DownShortener));
    session.set_slug("harbour-coffee");

    let qr = session
        .generate_qr(QrCustomization::default(), true)
        .await
        .unwrap();
    assert!(!qr.is_dynamic);
    assert_eq!(qr.destination, "https://pages.example.com/harbour-coffee");
}

#[tokio::test(start_paused = true)]
async fn test_qr_needs_service_and_slug() {
    let store = Arc::new(GatedStore::default());
    let mut session = StudioSession::open(config(), dyn_store(&store), None)
        .await
        .unwrap();
    assert!(matches!(
        session.generate_qr(QrCustomization::default(), false).await,
        Err(StudioError::Service(ServiceError::Unavailable(_)))
    ));

    let mut session = session.with_qr_service(Arc::new(FakeQr));
    assert!(matches!(
        session.generate_qr(QrCustomization::default(), false).await,
        Err(StudioError::Service(ServiceError::Rejected(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_undo_revalidates_slug() {
    let store = Arc::new(GatedStore::with_pages([landing(
        "Existing",
        "taken-slug",
        PageStatus::Published,
    )]));
    let mut session = StudioSession::open(config(), dyn_store(&store), None)
        .await
        .unwrap();

    session.set_slug("fresh-slug");
    assert_eq!(
        session.slug_validator().settle().await,
        AvailabilityState::Available
    );
    session.set_slug("taken-slug");
    assert!(matches!(
        session.slug_validator().settle().await,
        AvailabilityState::Unavailable { .. }
    ));

    assert!(session.undo());
    assert_eq!(
        session.current_document().link_metadata.slug,
        "fresh-slug"
    );
    assert_eq!(
        session.slug_validator().settle().await,
        AvailabilityState::Available
    );
}

#[tokio::test(start_paused = true)]
async fn test_locked_slug_is_not_editable() {
    let store = Arc::new(GatedStore::default());
    let mut session = StudioSession::open(config(), dyn_store(&store), None)
        .await
        .unwrap();
    session.set_slug("first-slug");
    assert!(session.set_slug_locked(true));
    assert!(!session.set_slug("second-slug"));
    assert_eq!(session.current_document().link_metadata.slug, "first-slug");
}

#[tokio::test(start_paused = true)]
async fn test_canvas_matches_published_viewer() {
    let store = Arc::new(GatedStore::default());
    let mut session = StudioSession::open(config(), dyn_store(&store), None)
        .await
        .unwrap();
    for kind in pagesmith_common::BlockType::ALL {
        session.add_block(kind);
    }
    session.update_design_tokens(|tokens| tokens.background.color = "#0f172a".to_string());

    let canvas = session.render(RenderSurface::Canvas).to_html();
    let stored = serde_json::to_string(&session.current_document()).unwrap();
    let viewer = PublishedViewer::from_json(&stored).unwrap();
    assert_eq!(viewer.to_html(), canvas);
}

#[tokio::test(start_paused = true)]
async fn test_history_persists_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let config = StudioConfig {
        history_dir: Some(dir.path().to_path_buf()),
        ..config()
    };
    let store = Arc::new(GatedStore::with_pages([landing(
        "Menu",
        "menu-page",
        PageStatus::Draft,
    )]));
    let id = store.inner.pages().unwrap()[0].id.clone().unwrap();

    let mut session = StudioSession::open(config.clone(), dyn_store(&store), Some(&id))
        .await
        .unwrap();
    session.add_block(pagesmith_common::BlockType::Gallery);
    session.save_draft().await.unwrap();
    session.close().unwrap();

    let mut reopened = StudioSession::open(config, dyn_store(&store), Some(&id))
        .await
        .unwrap();
    assert_eq!(reopened.tree().blocks().len(), 2);
    assert!(reopened.undo());
    assert_eq!(reopened.tree().blocks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_first_save_keeps_history_of_new_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = StudioConfig {
        history_dir: Some(dir.path().to_path_buf()),
        ..config()
    };
    let store = Arc::new(GatedStore::default());

    let mut session = StudioSession::open(config.clone(), dyn_store(&store), None)
        .await
        .unwrap();
    session.add_block(pagesmith_common::BlockType::Header);
    session.add_block(pagesmith_common::BlockType::Contact);
    session.set_page_name("Spring Menu");
    session.save_draft().await.unwrap();
    let id = session.page_id().cloned().unwrap();
    session.close().unwrap();

    let mut reopened = StudioSession::open(config.clone(), dyn_store(&store), Some(&id))
        .await
        .unwrap();
    assert_eq!(reopened.tree().blocks().len(), 2);
    assert!(reopened.tree().can_undo());
    assert!(reopened.undo());
    assert_eq!(reopened.tree().blocks().len(), 1);
    reopened.close().unwrap();

    // another blank page starts with nothing to undo
    let blank = StudioSession::open(config, dyn_store(&store), None)
        .await
        .unwrap();
    assert!(blank.tree().blocks().is_empty());
    assert!(!blank.tree().can_undo());
}

#[tokio::test(start_paused = true)]
async fn test_delete_and_missing_pages() {
    let store = Arc::new(GatedStore::with_pages([landing(
        "Menu",
        "menu-page",
        PageStatus::Draft,
    )]));
    let id = store.inner.pages().unwrap()[0].id.clone().unwrap();

    let mut session = StudioSession::open(config(), dyn_store(&store), Some(&id))
        .await
        .unwrap();
    session.delete().await.unwrap();
    assert_eq!(session.page_id(), None);
    assert!(matches!(session.delete().await, Err(StudioError::Unsaved)));

    assert!(matches!(
        StudioSession::open(config(), dyn_store(&store), Some(&id)).await,
        Err(StudioError::Store(_))
    ));
}
