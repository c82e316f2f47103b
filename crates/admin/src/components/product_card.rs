//! Product card view model.
//!
//! Product browsing renders each listed product as a card: image, name and
//! formatted price. Styling belongs to the presentation layer.

use serde::Serialize;

use crate::services::Product;

/// Display-ready fields of a product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub name: String,
    /// Price formatted in the store currency (e.g. `R$ 19,90`).
    pub price: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price().display(),
            image_url: product.url.clone(),
            category: product.category.as_ref().map(|c| c.name.clone()),
        }
    }
}
