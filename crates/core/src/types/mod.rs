//! Core types for Code Burger.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod session;

pub use category::CategoryOption;
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use session::{SESSION_KEY, SessionRecord};
