//! Response types for the product API.

use codeburger_core::{CategoryOption, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as listed by `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Accepts both JSON numbers and numeric strings.
    pub price: Decimal,
    /// Public URL of the product image.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryOption>,
}

impl Product {
    /// Price in the store currency.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::brl(self.price)
    }
}
