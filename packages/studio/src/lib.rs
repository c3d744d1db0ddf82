//! # Pagesmith Studio
//!
//! The async side of the page studio: availability validation, the publish
//! lifecycle, scan resolution and the session tying them to an editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   edits   ┌──────────────┐
//! │ StudioSession│──────────▶│ ContentTree  │ (undo/redo)
//! └──────┬───────┘           └──────────────┘
//!        │ keystrokes
//!        ▼
//! ┌──────────────┐  debounced existence checks
//! │AsyncValidator│──────────────────────────────┐
//! └──────┬───────┘                              ▼
//!        │ verdicts        ┌──────────────┐ ┌──────────┐
//!        └────────────────▶│  Publisher   │▶│PageStore │
//!                          └──────────────┘ └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pagesmith_common::{BlockType, PageStatus};
//! use pagesmith_studio::{MemoryPageStore, StudioConfig, StudioSession};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StudioConfig {
//!     validation_debounce_ms: 0,
//!     ..Default::default()
//! };
//! let mut session = StudioSession::open(config, Arc::new(MemoryPageStore::new()), None).await?;
//!
//! session.set_page_name("Spring Menu");
//! session.set_slug("Spring Menu");
//! session.add_block(BlockType::Header);
//!
//! let page = session.publish().await?;
//! assert_eq!(page.status, PageStatus::Published);
//! # Ok(())
//! # }
//! ```

pub mod collaborators;
pub mod config;
pub mod error;
pub mod publish;
pub mod scan;
pub mod session;
pub mod store;
pub mod validator;

pub use collaborators::{LinkShortener, MemoryLinkShortener, QrAssetService, ShortLink};
pub use config::{StudioConfig, DEFAULT_BASE_URL, DEFAULT_CONFIG_NAME, DEFAULT_DEBOUNCE_MS};
pub use error::*;
pub use publish::PublishController;
pub use scan::{ScanResolver, ScanTarget};
pub use session::StudioSession;
pub use store::{MemoryPageStore, PageStore};
pub use validator::{AsyncValidator, AvailabilityState, ValidatedField};
