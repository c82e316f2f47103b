//! Product commands.
//!
//! # Usage
//!
//! ```bash
//! cb-cli categories
//! cb-cli products list
//! cb-cli products create -n "X-Bacon" -p 32.50 -c 1 -f bacon.png
//! ```
//!
//! `products create` runs the same flow as the new-product form: the admin
//! gate is checked, categories are loaded, the draft is validated locally and
//! only then sent. After a successful creation the flow navigates to the
//! product list, which is printed.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use codeburger_admin::components::ProductCard;
use codeburger_admin::forms::{
    FlowError, Navigator, Notifier, ProductSubmissionFlow, SubmissionOutcome,
};
use codeburger_admin::routes::NEW_PRODUCT;
use codeburger_admin::services::{HttpProductService, ProductService};
use codeburger_admin::{AdminConfig, AppError};
use codeburger_core::{
    CategoryId, ImageFile, Notification, NotificationKind, ProductDraft, ValidationResult, paths,
};
use tracing::{error, info, warn};

/// Print the selectable categories.
#[allow(clippy::print_stdout)]
pub async fn categories(config: &AdminConfig) -> Result<(), AppError> {
    let gate = super::gate(config);
    let service = super::product_service(config, &gate)?;

    for category in service.categories().await? {
        println!("{}\t{}", category.id, category.name);
    }
    Ok(())
}

/// Print the product listing.
pub async fn list(config: &AdminConfig) -> Result<(), AppError> {
    let gate = super::gate(config);
    super::require(&gate, paths::PRODUCT_LIST)?;
    let service = super::product_service(config, &gate)?;
    print_products(&service).await
}

/// Create a product from command-line input.
pub async fn create(
    config: &AdminConfig,
    name: String,
    price: String,
    category: i32,
    files: &[PathBuf],
) -> Result<(), AppError> {
    let gate = super::gate(config);
    super::require(&gate, NEW_PRODUCT)?;
    let service = super::product_service(config, &gate)?;

    let navigator = Arc::new(CliNavigator::default());
    let flow = ProductSubmissionFlow::new(service.clone(), LogNotifier, Arc::clone(&navigator));
    flow.mount().await;

    let mut draft = ProductDraft::new().with_name(name).with_price(price);
    match flow.category(CategoryId::new(category)) {
        Some(option) => draft = draft.with_category(option),
        None => warn!(category, "No such category"),
    }
    for path in files {
        draft = draft.with_file(read_image(path).await?);
    }

    let outcome = flow.submit(&draft).await;
    let result = match outcome {
        Ok(SubmissionOutcome::Success) => {
            flow.wait_for_navigation().await;
            Ok(())
        }
        Ok(SubmissionOutcome::Failure(reason)) => Err(AppError::NotCreated(reason)),
        Ok(SubmissionOutcome::Pending) => Ok(()),
        Err(FlowError::Invalid(errors)) => {
            report_field_errors(&errors);
            Err(FlowError::Invalid(errors).into())
        }
        Err(e) => Err(e.into()),
    };
    flow.unmount();
    result?;

    if navigator.destination() == Some(paths::PRODUCT_LIST) {
        print_products(&service).await?;
    }
    Ok(())
}

async fn read_image(path: &Path) -> Result<ImageFile, AppError> {
    let bytes = tokio::fs::read(path).await?;
    let name = path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    Ok(ImageFile::from_name(name, bytes)?)
}

#[allow(clippy::print_stdout)]
async fn print_products(service: &HttpProductService) -> Result<(), AppError> {
    for card in service.products().await?.iter().map(ProductCard::from) {
        println!(
            "{}\t{}\t{}",
            card.name,
            card.price,
            card.category.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

#[allow(clippy::print_stderr)]
fn report_field_errors(errors: &ValidationResult) {
    for (field, err) in errors.iter() {
        eprintln!("{}: {}", field.as_str(), err.message(field));
    }
}

/// Shows notifications as log events.
#[derive(Debug, Clone, Copy)]
struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Pending | NotificationKind::Success => {
                info!("{}", notification.message);
            }
            NotificationKind::Warning => warn!("{}", notification.message),
            NotificationKind::Error => error!("{}", notification.message),
        }
    }
}

/// Remembers where the flow asked to go.
#[derive(Debug, Default)]
struct CliNavigator {
    destination: Mutex<Option<&'static str>>,
}

impl CliNavigator {
    fn destination(&self) -> Option<&'static str> {
        *self
            .destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for CliNavigator {
    fn navigate(&self, path: &'static str) {
        *self
            .destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(path);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_keeps_last_destination() {
        let navigator = CliNavigator::default();
        assert_eq!(navigator.destination(), None);

        navigator.navigate(paths::HOME);
        navigator.navigate(paths::PRODUCT_LIST);
        assert_eq!(navigator.destination(), Some(paths::PRODUCT_LIST));
    }

    #[tokio::test]
    async fn test_read_image_rejects_unsupported_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.gif");
        tokio::fs::write(&path, b"GIF89a").await.unwrap();

        let result = read_image(&path).await;

        assert!(matches!(result, Err(AppError::Image(_))));
    }

    #[tokio::test]
    async fn test_read_image_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x-bacon.png");
        tokio::fs::write(&path, [0x89, b'P', b'N', b'G']).await.unwrap();

        let image = read_image(&path).await.unwrap();

        assert_eq!(image.content_type(), "image/png");
        assert_eq!(image.name(), "x-bacon.png");
        assert_eq!(image.size(), 4);
    }
}
