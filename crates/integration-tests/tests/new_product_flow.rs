//! End-to-end tests for the new-product form.
//!
//! Session file, access gate, HTTP client and submission flow are wired
//! together the way a front-end wires them, against an in-process fake API.
//!
//! Run with: cargo test -p codeburger-integration-tests

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::http::StatusCode;
use codeburger_admin::forms::{FlowError, FlowState, ProductSubmissionFlow, SubmissionOutcome};
use codeburger_admin::routes::{AccessGate, NEW_PRODUCT};
use codeburger_admin::services::{HttpProductService, ProductService};
use codeburger_admin::session::{FileSessionStore, save_session};
use codeburger_core::{
    CategoryId, CategoryOption, Decision, Field, FieldError, ImageFile, MAX_IMAGE_BYTES,
    Notification, ProductDraft, SessionRecord, paths,
};
use codeburger_integration_tests::{FakeApi, RecordingNavigator, RecordingNotifier};
use secrecy::SecretString;
use tempfile::TempDir;

type Flow = ProductSubmissionFlow<
    HttpProductService,
    Arc<RecordingNotifier>,
    Arc<RecordingNavigator>,
>;

struct Harness {
    api: FakeApi,
    gate: AccessGate<FileSessionStore>,
    flow: Flow,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
    _session_dir: TempDir,
}

impl Harness {
    /// Sign in with `record`, then build the client from the stored session
    /// the way a page load does.
    fn signed_in(api: FakeApi, record: Option<SessionRecord>) -> Self {
        let session_dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(session_dir.path().join("session.json"));
        if let Some(record) = record {
            save_session(&store, &record).unwrap();
        }
        let gate = AccessGate::new(store);

        let token = gate
            .session()
            .and_then(|s| s.token)
            .map(SecretString::from);
        let service = HttpProductService::new(&api.config().unwrap(), token).unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let flow = ProductSubmissionFlow::new(
            service,
            Arc::clone(&notifier),
            Arc::clone(&navigator),
        );

        Self {
            api,
            gate,
            flow,
            notifier,
            navigator,
            _session_dir: session_dir,
        }
    }

    fn admin(api: FakeApi) -> Self {
        let record = SessionRecord::new("admin@codeburger.com", true).with_token("t0k3n");
        Self::signed_in(api, Some(record))
    }
}

fn lanches() -> CategoryOption {
    CategoryOption::new(CategoryId::new(1), "Lanches")
}

fn complete_draft(category: CategoryOption) -> ProductDraft {
    ProductDraft::new()
        .with_name("X-Salada")
        .with_price("27.90")
        .with_category(category)
        .with_file(ImageFile::from_name("x-salada.jpeg", vec![0xFF; 2048]).unwrap())
}

#[tokio::test]
async fn test_admin_creates_product_and_lands_on_list() {
    let api = FakeApi::builder()
        .require_token("t0k3n")
        .spawn()
        .await
        .unwrap();
    let h = Harness::admin(api);

    assert_eq!(h.gate.check_path(NEW_PRODUCT), Some(Decision::Render));

    let categories = h.flow.mount().await;
    assert_eq!(categories.len(), 3);
    let category = h.flow.category(CategoryId::new(1)).unwrap();

    let outcome = h.flow.submit(&complete_draft(category)).await.unwrap();
    assert_eq!(outcome, SubmissionOutcome::Success);
    assert_eq!(h.flow.state(), FlowState::Succeeded);
    assert_eq!(
        h.notifier.messages(),
        [
            Notification::CREATING_PRODUCT.message,
            Notification::PRODUCT_CREATED.message
        ]
    );

    // Navigation waits for the success notification to be seen
    assert!(h.navigator.paths().is_empty());
    h.flow.wait_for_navigation().await;
    assert_eq!(h.navigator.paths(), [paths::PRODUCT_LIST]);

    assert_eq!(
        h.gate.check_path(paths::PRODUCT_LIST),
        Some(Decision::Render)
    );
    assert_eq!(h.api.product_count(), 1);
    assert_eq!(
        h.api.uploads()[0].authorization.as_deref(),
        Some("Bearer t0k3n")
    );
}

#[tokio::test]
async fn test_failed_creation_keeps_form_editable() {
    let api = FakeApi::builder()
        .create_status(StatusCode::INTERNAL_SERVER_ERROR)
        .spawn()
        .await
        .unwrap();
    let h = Harness::admin(api);
    h.flow.mount().await;

    let outcome = h.flow.submit(&complete_draft(lanches())).await.unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Failure(_)));
    assert_eq!(h.flow.state(), FlowState::Failed);
    assert!(!h.flow.is_busy());
    assert_eq!(
        h.notifier.messages(),
        [
            Notification::CREATING_PRODUCT.message,
            Notification::PRODUCT_FAILED.message
        ]
    );

    h.flow.wait_for_navigation().await;
    assert!(h.navigator.paths().is_empty());

    // The user may try again with the same draft
    let again = h.flow.submit(&complete_draft(lanches())).await.unwrap();
    assert!(matches!(again, SubmissionOutcome::Failure(_)));
    assert_eq!(h.api.uploads().len(), 2);
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_api() {
    let api = FakeApi::spawn().await.unwrap();
    let h = Harness::admin(api);
    h.flow.mount().await;
    let before = h.api.request_count();

    let err = h.flow.submit(&ProductDraft::new()).await.unwrap_err();
    let errors = match err {
        FlowError::Invalid(errors) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert_eq!(errors.len(), 4);
    assert_eq!(errors.message(Field::Name), Some("Digite o nome do produto"));
    assert_eq!(errors.message(Field::Image), Some("Insira uma imagem"));

    assert_eq!(h.flow.state(), FlowState::Editing);
    assert_eq!(h.api.request_count(), before);
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_oversized_image_never_reaches_api() {
    let api = FakeApi::spawn().await.unwrap();
    let h = Harness::admin(api);
    h.flow.mount().await;

    let mut draft = complete_draft(lanches());
    draft.files = vec![ImageFile::from_name("big.png", vec![0; MAX_IMAGE_BYTES + 1]).unwrap()];

    let err = h.flow.submit(&draft).await.unwrap_err();
    let errors = match err {
        FlowError::Invalid(errors) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(Field::Image), Some(FieldError::TooLarge));
    assert!(h.api.uploads().is_empty());
}

#[tokio::test]
async fn test_category_failure_warns_and_leaves_selector_empty() {
    let api = FakeApi::builder()
        .categories_status(StatusCode::INTERNAL_SERVER_ERROR)
        .spawn()
        .await
        .unwrap();
    let h = Harness::admin(api);

    assert!(h.flow.mount().await.is_empty());
    assert!(h.flow.categories().is_empty());
    assert_eq!(
        h.notifier.messages(),
        [Notification::CATEGORIES_FAILED.message]
    );
}

#[tokio::test]
async fn test_rejected_token_fails_submission() {
    let api = FakeApi::builder()
        .require_token("fresh")
        .spawn()
        .await
        .unwrap();
    let h = Harness::admin(api);

    assert!(h.flow.mount().await.is_empty());
    let outcome = h.flow.submit(&complete_draft(lanches())).await.unwrap();

    let reason = match outcome {
        SubmissionOutcome::Failure(reason) => reason,
        other => panic!("expected failure, got {other:?}"),
    };
    assert!(reason.contains("Unauthorized"));
    assert!(h.api.uploads().is_empty());
}

#[tokio::test]
async fn test_gate_blocks_non_admin_and_anonymous() {
    let api = FakeApi::spawn().await.unwrap();
    let user = SessionRecord::new("cliente@codeburger.com", false);
    let h = Harness::signed_in(api, Some(user));

    assert_eq!(
        h.gate.check_path(NEW_PRODUCT),
        Some(Decision::RedirectTo(paths::HOME))
    );
    assert_eq!(
        h.gate.check_path(paths::HOME),
        Some(Decision::RenderWithChrome)
    );

    let api = FakeApi::spawn().await.unwrap();
    let anonymous = Harness::signed_in(api, None);
    assert_eq!(
        anonymous.gate.check_path(NEW_PRODUCT),
        Some(Decision::RedirectTo(paths::LOGIN))
    );
    assert_eq!(anonymous.gate.check_path(paths::LOGIN), None);
}

#[tokio::test]
async fn test_listing_after_creation_uses_same_client() {
    let api = FakeApi::spawn().await.unwrap();
    let h = Harness::admin(api);
    h.flow.mount().await;
    h.flow.submit(&complete_draft(lanches())).await.unwrap();
    h.flow.unmount();

    // Unmounting cancels the pending navigation
    h.flow.wait_for_navigation().await;
    assert!(h.navigator.paths().is_empty());

    let service = HttpProductService::new(&h.api.config().unwrap(), None).unwrap();
    let products = service.products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price().display(), "R$ 27,90");
}
