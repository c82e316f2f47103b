//! Unified error handling for the admin client.

use codeburger_core::ImageFileError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::forms::FlowError;
use crate::services::ProductServiceError;
use crate::session::SessionStoreError;

/// Application-level error type for admin front-ends.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionStoreError),

    /// Product API operation failed.
    #[error("Product API error: {0}")]
    ProductService(#[from] ProductServiceError),

    /// The new-product form rejected a submission.
    #[error("Submission rejected: {0}")]
    Flow(#[from] FlowError),

    /// A picked file is not an accepted image.
    #[error("Invalid image: {0}")]
    Image(#[from] ImageFileError),

    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The route gate sent the user elsewhere.
    #[error("Access denied, redirected to {0}")]
    Redirected(&'static str),

    /// A submitted product was not created.
    #[error("Product was not created: {0}")]
    NotCreated(String),
}

impl AppError {
    /// Process exit code for command-line front-ends.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::Redirected(_) => 77,
            Self::Flow(FlowError::Invalid(_)) | Self::Image(_) => 65,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use codeburger_core::{ProductDraft, validate};

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Redirected("/login");
        assert_eq!(err.to_string(), "Access denied, redirected to /login");

        let err = AppError::from(FlowError::Invalid(validate(&ProductDraft::new())));
        assert_eq!(
            err.to_string(),
            "Submission rejected: 4 field(s) failed validation"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::Redirected("/").exit_code(), 77);
        assert_eq!(
            AppError::from(FlowError::Invalid(validate(&ProductDraft::new()))).exit_code(),
            65
        );
        assert_eq!(AppError::NotCreated("boom".to_string()).exit_code(), 1);
    }
}
