//! Product API client.
//!
//! # Endpoints
//!
//! ```text
//! GET  /categories   - Selectable categories ([{id, name}])
//! GET  /products     - Product listing
//! POST /products     - Create a product (multipart: name, price, category_id, file)
//! ```
//!
//! Authentication: the login token, when the session carries one, is sent as
//! `Authorization: Bearer <token>`. Requests are never retried.

mod types;

pub use types::Product;

use std::future::Future;
use std::sync::Arc;

use codeburger_core::{CategoryOption, NewProduct};
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::AdminConfig;

/// Errors that can occur when talking to the product API.
#[derive(Debug, Error)]
pub enum ProductServiceError {
    /// HTTP request failed (connection, timeout, body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API rejected the session token.
    #[error("Unauthorized: session token rejected")]
    Unauthorized,

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An endpoint URL could not be built.
    #[error("Invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
}

/// Operations the admin client needs from the product API.
pub trait ProductService: Send + Sync {
    /// List the categories a product can be filed under.
    fn categories(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryOption>, ProductServiceError>> + Send;

    /// List existing products.
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, ProductServiceError>> + Send;

    /// Create a product with a single multipart request.
    fn create_product(
        &self,
        product: &NewProduct,
    ) -> impl Future<Output = Result<(), ProductServiceError>> + Send;
}

impl<T: ProductService> ProductService for Arc<T> {
    fn categories(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryOption>, ProductServiceError>> + Send {
        (**self).categories()
    }

    fn products(&self) -> impl Future<Output = Result<Vec<Product>, ProductServiceError>> + Send {
        (**self).products()
    }

    fn create_product(
        &self,
        product: &NewProduct,
    ) -> impl Future<Output = Result<(), ProductServiceError>> + Send {
        (**self).create_product(product)
    }
}

/// Product API client over HTTP.
#[derive(Clone)]
pub struct HttpProductService {
    inner: Arc<HttpProductServiceInner>,
}

struct HttpProductServiceInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl HttpProductService {
    /// Create a client for the configured API.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig, token: Option<SecretString>) -> Result<Self, ProductServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpProductServiceInner {
                client,
                base_url: config.api_url.clone(),
                token,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProductServiceError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.inner.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ProductServiceError> {
        let url = self.endpoint(path)?;
        let response = self.authorize(self.inner.client.get(url)).send().await?;

        if !response.status().is_success() {
            return Err(parse_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ProductServiceError::Parse(format!("Failed to parse response: {e}")))
    }
}

impl ProductService for HttpProductService {
    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<CategoryOption>, ProductServiceError> {
        let categories: Vec<CategoryOption> = self.get_json("categories").await?;
        debug!(count = categories.len(), "Loaded categories");
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, ProductServiceError> {
        let products: Vec<Product> = self.get_json("products").await?;
        debug!(count = products.len(), "Loaded products");
        Ok(products)
    }

    #[instrument(
        skip(self, product),
        fields(name = %product.name(), category_id = %product.category_id())
    )]
    async fn create_product(&self, product: &NewProduct) -> Result<(), ProductServiceError> {
        let url = self.endpoint("products")?;
        let form = multipart_form(product)?;

        let response = self
            .authorize(self.inner.client.post(url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(parse_error(response).await);
        }

        debug!(status = response.status().as_u16(), "Product created");
        Ok(())
    }
}

impl std::fmt::Debug for HttpProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProductService")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &self.inner.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

/// Build the multipart body: `name`, `price`, `category_id` and `file`.
fn multipart_form(product: &NewProduct) -> Result<Form, ProductServiceError> {
    let image = product.image();
    let file = Part::bytes(image.bytes().to_vec())
        .file_name(image.name().to_owned())
        .mime_str(image.content_type())?;

    Ok(Form::new()
        .text("name", product.name().to_owned())
        .text("price", product.price().to_owned())
        .text("category_id", product.category_id().to_string())
        .part("file", file))
}

/// Map a non-success response to an error.
async fn parse_error(response: reqwest::Response) -> ProductServiceError {
    let status = response.status().as_u16();

    if status == 401 || status == 403 {
        return ProductServiceError::Unauthorized;
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    ProductServiceError::Api { status, message }
}
