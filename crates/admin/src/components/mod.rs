//! View-model components shared by admin screens.

pub mod product_card;

pub use product_card::ProductCard;
