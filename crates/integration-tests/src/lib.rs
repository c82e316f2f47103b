//! Integration tests for Code Burger.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p codeburger-integration-tests
//! ```
//!
//! Tests run the real HTTP client and form flow against [`FakeApi`], an
//! in-process stand-in for the product API bound to an ephemeral port. No
//! external services are needed.
//!
//! # Test Categories
//!
//! - `product_api` - HTTP client against the product endpoints
//! - `new_product_flow` - Form flow, access gate and session end to end

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use codeburger_admin::AdminConfig;
use codeburger_admin::forms::{Navigator, Notifier};
use codeburger_core::{CategoryId, CategoryOption, Notification};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One `POST /products` request as the fake API received it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedUpload {
    /// Text parts by name.
    pub fields: BTreeMap<String, String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub file_len: Option<usize>,
    /// Names of every part, in order.
    pub part_names: Vec<String>,
    pub authorization: Option<String>,
}

/// A product as the fake API lists it.
#[derive(Debug, Clone, Serialize)]
struct StoredProduct {
    id: i32,
    name: String,
    price: String,
    category_id: i32,
    url: Option<String>,
    category: Option<CategoryOption>,
}

/// Configures a [`FakeApi`] before it starts.
#[derive(Debug, Clone)]
pub struct FakeApiBuilder {
    categories: Vec<CategoryOption>,
    categories_status: StatusCode,
    create_status: StatusCode,
    token: Option<String>,
}

impl Default for FakeApiBuilder {
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryOption::new(CategoryId::new(1), "Lanches"),
                CategoryOption::new(CategoryId::new(2), "Bebidas"),
                CategoryOption::new(CategoryId::new(3), "Sobremesas"),
            ],
            categories_status: StatusCode::OK,
            create_status: StatusCode::CREATED,
            token: None,
        }
    }
}

impl FakeApiBuilder {
    /// Respond to `GET /categories` with `status` instead of the list.
    #[must_use]
    pub const fn categories_status(mut self, status: StatusCode) -> Self {
        self.categories_status = status;
        self
    }

    /// Respond to `POST /products` with `status`. Non-success statuses
    /// still record the upload.
    #[must_use]
    pub const fn create_status(mut self, status: StatusCode) -> Self {
        self.create_status = status;
        self
    }

    /// Require `Authorization: Bearer <token>` on every endpoint.
    #[must_use]
    pub fn require_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn spawn(self) -> std::io::Result<FakeApi> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(ApiState {
            base_url: format!("http://{addr}"),
            categories: self.categories,
            categories_status: self.categories_status,
            create_status: self.create_status,
            token: self.token,
            products: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            requests: AtomicUsize::new(0),
            next_id: AtomicI32::new(1),
        });

        let app = Router::new()
            .route("/categories", get(list_categories))
            .route("/products", get(list_products).post(create_product))
            .with_state(Arc::clone(&state));

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(FakeApi { state, server })
    }
}

/// In-process product API.
#[derive(Debug)]
pub struct FakeApi {
    state: Arc<ApiState>,
    server: JoinHandle<()>,
}

impl FakeApi {
    #[must_use]
    pub fn builder() -> FakeApiBuilder {
        FakeApiBuilder::default()
    }

    /// Start a fake API with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn spawn() -> std::io::Result<Self> {
        Self::builder().spawn().await
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.state.base_url
    }

    /// Client configuration pointing at this API.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is rejected.
    pub fn config(&self) -> Result<AdminConfig, codeburger_admin::config::ConfigError> {
        let base_url = self.state.base_url.clone();
        AdminConfig::from_vars(|key| (key == "CODEBURGER_API_URL").then(|| base_url.clone()))
    }

    /// Every request received so far, on any endpoint.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Product uploads received so far.
    #[must_use]
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        lock(&self.state.uploads).clone()
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        lock(&self.state.products).len()
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

#[derive(Debug)]
struct ApiState {
    base_url: String,
    categories: Vec<CategoryOption>,
    categories_status: StatusCode,
    create_status: StatusCode,
    token: Option<String>,
    products: Mutex<Vec<StoredProduct>>,
    uploads: Mutex<Vec<RecordedUpload>>,
    requests: AtomicUsize,
    next_id: AtomicI32,
}

impl ApiState {
    fn admit(&self, headers: &HeaderMap) -> Result<(), Response> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let Some(token) = &self.token else {
            return Ok(());
        };
        let expected = format!("Bearer {token}");
        match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some(value) if value == expected => Ok(()),
            _ => Err((StatusCode::UNAUTHORIZED, "invalid token").into_response()),
        }
    }

    fn store(&self, upload: &RecordedUpload) -> Result<StoredProduct, Response> {
        let field = |name: &str| upload.fields.get(name).cloned().unwrap_or_default();

        let price = field("price");
        if price.parse::<f64>().is_err() {
            return Err((StatusCode::BAD_REQUEST, "price must be a number").into_response());
        }
        let Ok(category_id) = field("category_id").parse::<i32>() else {
            return Err((StatusCode::BAD_REQUEST, "category_id must be an id").into_response());
        };

        let product = StoredProduct {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: field("name"),
            price,
            category_id,
            url: upload
                .file_name
                .as_ref()
                .map(|name| format!("{}/product-file/{name}", self.base_url)),
            category: self
                .categories
                .iter()
                .find(|c| c.id == CategoryId::new(category_id))
                .cloned(),
        };
        lock(&self.products).push(product.clone());
        Ok(product)
    }
}

async fn list_categories(State(api): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = api.admit(&headers) {
        return denied;
    }
    if !api.categories_status.is_success() {
        return (api.categories_status, "categories unavailable").into_response();
    }
    Json(api.categories.clone()).into_response()
}

async fn list_products(State(api): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = api.admit(&headers) {
        return denied;
    }
    Json(lock(&api.products).clone()).into_response()
}

async fn create_product(
    State(api): State<Arc<ApiState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(denied) = api.admit(&headers) {
        return denied;
    }

    let mut upload = RecordedUpload {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        ..RecordedUpload::default()
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return (StatusCode::BAD_REQUEST, e.body_text()).into_response(),
        };

        let name = field.name().unwrap_or_default().to_owned();
        upload.part_names.push(name.clone());

        if name == "file" {
            upload.file_name = field.file_name().map(str::to_owned);
            upload.content_type = field.content_type().map(str::to_owned);
            match field.bytes().await {
                Ok(bytes) => upload.file_len = Some(bytes.len()),
                Err(e) => return (StatusCode::BAD_REQUEST, e.body_text()).into_response(),
            }
        } else {
            match field.text().await {
                Ok(text) => {
                    upload.fields.insert(name, text);
                }
                Err(e) => return (StatusCode::BAD_REQUEST, e.body_text()).into_response(),
            }
        }
    }

    lock(&api.uploads).push(upload.clone());

    if !api.create_status.is_success() {
        return (api.create_status, "could not create product").into_response();
    }

    match api.store(&upload) {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(rejected) => rejected,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Notifier that records every notification.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn messages(&self) -> Vec<&'static str> {
        lock(&self.seen).iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        lock(&self.seen).push(notification.clone());
    }
}

/// Navigator that records every requested path.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<&'static str>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn paths(&self) -> Vec<&'static str> {
        lock(&self.paths).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &'static str) {
        lock(&self.paths).push(path);
    }
}
