//! New-product form workflow.
//!
//! # States
//!
//! ```text
//! Editing ──submit──▶ Validating ──invalid──▶ Editing (field errors set)
//!                          │
//!                          └──valid──▶ Submitting ──▶ Succeeded ──2s──▶ /listar-produtos
//!                                           │
//!                                           └──────▶ Failed (draft still editable)
//! ```
//!
//! One flow instance backs one mounted form. Only one submission may be in
//! flight at a time, and nothing is updated or shown once the form has been
//! unmounted.
//!
//! Every mount and unmount advances a mount epoch; odd epochs are mounted.
//! A request or navigation remembers the epoch it started in and is dropped
//! if the epoch has moved on by the time it settles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use codeburger_core::{
    CategoryId, CategoryOption, Notification, ProductDraft, ValidationResult, paths,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::{Navigator, Notifier};
use crate::services::ProductService;

/// Pause between a successful creation and leaving the form, so the success
/// notification stays on screen.
pub const NAVIGATION_DELAY: Duration = Duration::from_secs(2);

/// Where the form is in a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowState {
    #[default]
    Editing,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Result of the product request, as surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Pending,
    Success,
    Failure(String),
}

/// Reasons a submission attempt did not reach the product API.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("form is not mounted")]
    NotMounted,

    #[error("a submission is already in flight")]
    InFlight,

    #[error("product was already created from this form")]
    AlreadySubmitted,

    #[error("{} field(s) failed validation", .0.len())]
    Invalid(ValidationResult),
}

#[derive(Debug, Default)]
struct FlowInner {
    state: FlowState,
    field_errors: ValidationResult,
    outcome: Option<SubmissionOutcome>,
    categories: Vec<CategoryOption>,
    navigation: Option<JoinHandle<()>>,
}

/// Drives validation and submission for one mounted new-product form.
pub struct ProductSubmissionFlow<P, N, V> {
    service: P,
    notifier: N,
    navigator: Arc<V>,
    epoch: Arc<AtomicU64>,
    inner: Mutex<FlowInner>,
}

const fn is_mounted_epoch(epoch: u64) -> bool {
    epoch % 2 == 1
}

impl<P, N, V> ProductSubmissionFlow<P, N, V>
where
    P: ProductService,
    N: Notifier,
    V: Navigator + 'static,
{
    /// Create an unmounted flow. Call [`Self::mount`] before submitting.
    pub fn new(service: P, notifier: N, navigator: V) -> Self {
        Self {
            service,
            notifier,
            navigator: Arc::new(navigator),
            epoch: Arc::new(AtomicU64::new(0)),
            inner: Mutex::new(FlowInner::default()),
        }
    }

    fn inner(&self) -> MutexGuard<'_, FlowInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Mount the form and load its category options.
    ///
    /// Mounting starts a fresh form, except while a submission is in flight
    /// on the mounted form: then the form state is kept and only the
    /// categories are reloaded.
    ///
    /// A failed load is reported with a warning notification and leaves the
    /// category list empty; it never fails the mount.
    #[instrument(skip(self))]
    pub async fn mount(&self) -> Vec<CategoryOption> {
        let epoch = {
            let mut inner = self.inner();
            let current = self.current_epoch();
            let in_flight = matches!(inner.state, FlowState::Validating | FlowState::Submitting);

            if is_mounted_epoch(current) && in_flight {
                debug!("Submission in flight, keeping form state");
                current
            } else {
                if let Some(handle) = inner.navigation.take() {
                    handle.abort();
                }
                *inner = FlowInner::default();
                let next = if is_mounted_epoch(current) { current + 2 } else { current + 1 };
                self.epoch.store(next, Ordering::Release);
                next
            }
        };

        let loaded = self.service.categories().await;
        let mut inner = self.inner();
        if self.current_epoch() != epoch {
            debug!("Form remounted or unmounted before categories loaded");
            return Vec::new();
        }

        match loaded {
            Ok(categories) => {
                debug!(count = categories.len(), "Category selector populated");
                inner.categories.clone_from(&categories);
                categories
            }
            Err(e) => {
                drop(inner);
                warn!(error = %e, "Failed to load categories");
                self.notifier.notify(&Notification::CATEGORIES_FAILED);
                Vec::new()
            }
        }
    }

    /// Tear the form down. A pending request's result is dropped and a
    /// scheduled navigation is cancelled.
    pub fn unmount(&self) {
        let mut inner = self.inner();
        let current = self.current_epoch();
        if is_mounted_epoch(current) {
            self.epoch.store(current + 1, Ordering::Release);
        }
        if let Some(handle) = inner.navigation.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        is_mounted_epoch(self.current_epoch())
    }

    #[must_use]
    pub fn state(&self) -> FlowState {
        self.inner().state
    }

    /// Whether the submit control should be disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.state(), FlowState::Validating | FlowState::Submitting)
    }

    /// Field errors from the last rejected attempt.
    #[must_use]
    pub fn field_errors(&self) -> ValidationResult {
        self.inner().field_errors.clone()
    }

    /// Outcome of the last request, if one was sent.
    #[must_use]
    pub fn outcome(&self) -> Option<SubmissionOutcome> {
        self.inner().outcome.clone()
    }

    /// Options loaded at mount.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryOption> {
        self.inner().categories.clone()
    }

    /// Look up a loaded option by id.
    #[must_use]
    pub fn category(&self, id: CategoryId) -> Option<CategoryOption> {
        self.inner().categories.iter().find(|c| c.id == id).cloned()
    }

    /// Validate `draft` and, if it passes, send it.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Invalid`] with every failing field when the draft
    /// does not validate; nothing is sent in that case. Returns
    /// [`FlowError::InFlight`], [`FlowError::AlreadySubmitted`] or
    /// [`FlowError::NotMounted`] when the form cannot accept a submission.
    /// A request that reaches the API and fails is not an error here: it
    /// yields `Ok(SubmissionOutcome::Failure(_))`.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn submit(&self, draft: &ProductDraft) -> Result<SubmissionOutcome, FlowError> {
        let epoch = {
            let mut inner = self.inner();
            let epoch = self.current_epoch();
            if !is_mounted_epoch(epoch) {
                return Err(FlowError::NotMounted);
            }
            match inner.state {
                FlowState::Validating | FlowState::Submitting => return Err(FlowError::InFlight),
                FlowState::Succeeded => return Err(FlowError::AlreadySubmitted),
                FlowState::Editing | FlowState::Failed => inner.state = FlowState::Validating,
            }
            epoch
        };

        let product = match draft.validated() {
            Ok(product) => product,
            Err(errors) => {
                debug!(invalid_fields = errors.len(), "Draft failed validation");
                let mut inner = self.inner();
                inner.state = FlowState::Editing;
                inner.field_errors = errors.clone();
                return Err(FlowError::Invalid(errors));
            }
        };

        {
            let mut inner = self.inner();
            inner.state = FlowState::Submitting;
            inner.field_errors = ValidationResult::default();
            inner.outcome = Some(SubmissionOutcome::Pending);
        }
        self.notifier.notify(&Notification::CREATING_PRODUCT);

        let result = self.service.create_product(&product).await;
        let outcome = match &result {
            Ok(()) => SubmissionOutcome::Success,
            Err(e) => SubmissionOutcome::Failure(e.to_string()),
        };

        let notification = {
            let mut inner = self.inner();
            if self.current_epoch() != epoch {
                debug!("Form unmounted before the request settled");
                return Ok(outcome);
            }

            inner.outcome = Some(outcome.clone());
            match result {
                Ok(()) => {
                    info!(category_id = %product.category_id(), "Product created");
                    inner.state = FlowState::Succeeded;
                    inner.navigation = Some(self.schedule_navigation(epoch));
                    Notification::PRODUCT_CREATED
                }
                Err(e) => {
                    warn!(error = %e, "Product creation failed");
                    inner.state = FlowState::Failed;
                    Notification::PRODUCT_FAILED
                }
            }
        };
        self.notifier.notify(&notification);

        Ok(outcome)
    }

    /// Wait until a scheduled navigation has run (or was cancelled).
    pub async fn wait_for_navigation(&self) {
        let handle = self.inner().navigation.take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
            && !e.is_cancelled()
        {
            warn!(error = %e, "Navigation task failed");
        }
    }

    fn schedule_navigation(&self, epoch: u64) -> JoinHandle<()> {
        let navigator = Arc::clone(&self.navigator);
        let current = Arc::clone(&self.epoch);

        tokio::spawn(async move {
            tokio::time::sleep(NAVIGATION_DELAY).await;
            if current.load(Ordering::Acquire) == epoch {
                navigator.navigate(paths::PRODUCT_LIST);
            } else {
                debug!("Form unmounted, skipping navigation");
            }
        })
    }
}

impl<P, N, V> std::fmt::Debug for ProductSubmissionFlow<P, N, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductSubmissionFlow")
            .field("epoch", &self.epoch.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
