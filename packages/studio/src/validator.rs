//! # Async Validator
//!
//! Debounced availability checking for one field (slug or page name).
//!
//! ```text
//! keystroke ─▶ normalize ─▶ format check ──fail──▶ Unavailable (no network)
//!                                │
//!                                ok
//!                                ▼
//!             bump generation, sleep debounce ─▶ Checking ─▶ existence query
//!                                                              │
//!                        Available / Unavailable / Idle(advisory on error)
//! ```
//!
//! Every request takes a generation token. Only the holder of the latest
//! token may change the state, so a slow response for an older value is
//! dropped on arrival instead of overwriting a newer verdict.

use crate::error::StoreError;
use crate::store::PageStore;
use pagesmith_common::{check_name_format, check_slug_format, normalize_name, sanitize_slug, PageId};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

pub const TRANSPORT_ADVISORY: &str =
    "Could not check availability right now; it will be checked again when you publish";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatedField {
    Slug,
    PageName,
}

impl ValidatedField {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidatedField::Slug => "slug",
            ValidatedField::PageName => "page_name",
        }
    }

    /// Normalized candidate, or the format problem with it
    pub fn prepare(self, raw: &str) -> Result<String, String> {
        match self {
            ValidatedField::Slug => {
                // checked before trimming so edge hyphens are reported
                let candidate = sanitize_slug(raw);
                check_slug_format(&candidate)
                    .map(|()| candidate)
                    .map_err(|e| e.to_string())
            }
            ValidatedField::PageName => {
                let candidate = normalize_name(raw);
                check_name_format(&candidate)
                    .map(|()| candidate)
                    .map_err(|e| e.to_string())
            }
        }
    }

    fn taken_reason(self) -> &'static str {
        match self {
            ValidatedField::Slug => "This slug is already in use",
            ValidatedField::PageName => "A landing page with this name already exists",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityState {
    Idle { advisory: Option<String> },
    Checking,
    Available,
    Unavailable { reason: String },
}

impl Default for AvailabilityState {
    fn default() -> Self {
        AvailabilityState::Idle { advisory: None }
    }
}

impl AvailabilityState {
    pub fn is_available(&self) -> bool {
        matches!(self, AvailabilityState::Available)
    }
}

/// Generation counter and state channel shared with spawned checks
#[derive(Debug)]
struct Shared {
    generation: Mutex<u64>,
    state: watch::Sender<AvailabilityState>,
}

impl Shared {
    fn generation(&self) -> MutexGuard<'_, u64> {
        self.generation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Supersede every outstanding request
    fn next_token(&self) -> u64 {
        let mut generation = self.generation();
        *generation += 1;
        *generation
    }

    /// Apply `state` only if `token` is still the latest request
    fn publish(&self, token: u64, state: AvailabilityState) -> bool {
        let generation = self.generation();
        if *generation != token {
            return false;
        }
        self.state.send_replace(state);
        true
    }

    fn current(&self) -> AvailabilityState {
        self.state.borrow().clone()
    }
}

#[derive(Clone)]
struct Checker {
    field: ValidatedField,
    store: Arc<dyn PageStore>,
    debounce: Duration,
    exclude: Option<PageId>,
    shared: Arc<Shared>,
}

impl Checker {
    async fn exists(&self, candidate: &str) -> Result<bool, StoreError> {
        match self.field {
            ValidatedField::Slug => {
                self.store
                    .check_slug_exists(candidate, self.exclude.as_ref())
                    .await
            }
            ValidatedField::PageName => {
                self.store
                    .check_name_exists(candidate, self.exclude.as_ref())
                    .await
            }
        }
    }

    async fn run(self, token: u64, candidate: String) -> AvailabilityState {
        tokio::time::sleep(self.debounce).await;
        if !self.shared.publish(token, AvailabilityState::Checking) {
            debug!(field = self.field.as_str(), "Check superseded during debounce");
            return self.shared.current();
        }

        let verdict = match self.exists(&candidate).await {
            Ok(false) => AvailabilityState::Available,
            Ok(true) => AvailabilityState::Unavailable {
                reason: self.field.taken_reason().to_string(),
            },
            Err(error) => {
                warn!(field = self.field.as_str(), %error, "Availability check failed");
                AvailabilityState::Idle {
                    advisory: Some(TRANSPORT_ADVISORY.to_string()),
                }
            }
        };

        if !self.shared.publish(token, verdict.clone()) {
            debug!(field = self.field.as_str(), candidate = %candidate, "Discarding stale result");
            return self.shared.current();
        }
        verdict
    }
}

pub struct AsyncValidator {
    field: ValidatedField,
    store: Arc<dyn PageStore>,
    debounce: Duration,
    exclude: Mutex<Option<PageId>>,
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<AvailabilityState>>>,
}

impl std::fmt::Debug for AsyncValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncValidator")
            .field("field", &self.field)
            .field("debounce", &self.debounce)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl AsyncValidator {
    pub fn new(field: ValidatedField, store: Arc<dyn PageStore>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(AvailabilityState::default());
        Self {
            field,
            store,
            debounce,
            exclude: Mutex::new(None),
            shared: Arc::new(Shared {
                generation: Mutex::new(0),
                state,
            }),
            task: Mutex::new(None),
        }
    }

    pub fn field(&self) -> ValidatedField {
        self.field
    }

    pub fn state(&self) -> AvailabilityState {
        self.shared.current()
    }

    /// Receives every state change
    pub fn subscribe(&self) -> watch::Receiver<AvailabilityState> {
        self.shared.state.subscribe()
    }

    /// The document being edited never collides with itself
    pub fn set_exclude(&self, id: Option<PageId>) {
        *self.exclude.lock().unwrap_or_else(|p| p.into_inner()) = id;
    }

    fn exclude(&self) -> Option<PageId> {
        self.exclude
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn checker(&self) -> Checker {
        Checker {
            field: self.field,
            store: self.store.clone(),
            debounce: self.debounce,
            exclude: self.exclude(),
            shared: self.shared.clone(),
        }
    }

    /// Synchronous half of a request: supersede older requests and settle
    /// format failures on the spot
    fn begin(&self, raw: &str) -> Result<(u64, String), AvailabilityState> {
        let token = self.shared.next_token();
        match self.field.prepare(raw) {
            Ok(candidate) => Ok((token, candidate)),
            Err(reason) => {
                let state = AvailabilityState::Unavailable { reason };
                self.shared.publish(token, state.clone());
                Err(state)
            }
        }
    }

    /// Validate `raw` in place, debounce included.
    ///
    /// Returns the resulting state; if a newer request superseded this one,
    /// that is whatever the newer request left behind.
    #[instrument(skip(self), fields(field = self.field.as_str()))]
    pub async fn validate(&self, raw: &str) -> AvailabilityState {
        match self.begin(raw) {
            Ok((token, candidate)) => self.checker().run(token, candidate).await,
            Err(state) => state,
        }
    }

    /// Fire-and-forget variant of [`validate`](Self::validate) for
    /// keystrokes; replaces any pending check
    pub fn schedule(&self, raw: &str) {
        let mut task = self.task.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = task.take() {
            previous.abort();
        }

        if let Ok((token, candidate)) = self.begin(raw) {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => *task = Some(runtime.spawn(self.checker().run(token, candidate))),
                Err(_) => {
                    // nothing will answer this request, so drop any older verdict
                    debug!(field = self.field.as_str(), "No runtime, availability unknown");
                    self.shared.publish(token, AvailabilityState::default());
                }
            }
        }
    }

    /// Drop any pending check and return to `Idle`
    pub fn cancel(&self) {
        if let Some(previous) = self.task.lock().unwrap_or_else(|p| p.into_inner()).take() {
            previous.abort();
        }
        let token = self.shared.next_token();
        self.shared.publish(token, AvailabilityState::default());
    }

    /// Wait for the pending scheduled check, if any
    pub async fn settle(&self) -> AvailabilityState {
        let pending = self.task.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(handle) = pending {
            // an aborted task just leaves the state as it was
            let _ = handle.await;
        }
        self.state()
    }

    /// Authoritative, undebounced check used right before publish or save.
    ///
    /// Supersedes pending checks and records its verdict. Transport errors
    /// are returned rather than failing open.
    #[instrument(skip(self), fields(field = self.field.as_str()))]
    pub async fn confirm(&self, raw: &str) -> Result<AvailabilityState, StoreError> {
        let (token, candidate) = match self.begin(raw) {
            Ok(request) => request,
            Err(state) => return Ok(state),
        };

        let verdict = if self.checker().exists(&candidate).await? {
            AvailabilityState::Unavailable {
                reason: self.field.taken_reason().to_string(),
            }
        } else {
            AvailabilityState::Available
        };
        self.shared.publish(token, verdict.clone());
        Ok(verdict)
    }
}

impl Drop for AsyncValidator {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().ok().and_then(Option::take) {
            task.abort();
        }
    }
}
