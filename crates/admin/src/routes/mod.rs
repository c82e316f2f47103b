//! Application route map and access guard.
//!
//! # Route Structure
//!
//! ```text
//! # Public
//! /login               - Login page
//! /cadastro            - Sign-up page
//!
//! # Signed-in users (rendered under the navigation header)
//! /                    - Home
//! /produtos            - Product browsing
//! /carrinho            - Cart
//!
//! # Admins (rendered without the shared header)
//! /pedidos             - Orders
//! /listar-produtos     - Product listing
//! /novo-produto        - New product form
//! ```

pub mod guard;

pub use guard::AccessGate;

use codeburger_core::{RouteRequirement, paths};

pub const REGISTER: &str = "/cadastro";
pub const PRODUCTS: &str = "/produtos";
pub const CART: &str = "/carrinho";
pub const ORDERS: &str = "/pedidos";
pub const NEW_PRODUCT: &str = "/novo-produto";

const ROUTES: &[(&str, Option<RouteRequirement>)] = &[
    (paths::LOGIN, None),
    (REGISTER, None),
    (paths::HOME, Some(RouteRequirement::AUTHENTICATED)),
    (PRODUCTS, Some(RouteRequirement::AUTHENTICATED)),
    (CART, Some(RouteRequirement::AUTHENTICATED)),
    (ORDERS, Some(RouteRequirement::ADMIN)),
    (paths::PRODUCT_LIST, Some(RouteRequirement::ADMIN)),
    (NEW_PRODUCT, Some(RouteRequirement::ADMIN)),
];

/// Requirement guarding `path`, or `None` for public and unknown paths.
///
/// A trailing slash is ignored, so `/pedidos/` is guarded like `/pedidos`.
#[must_use]
pub fn requirement_for(path: &str) -> Option<RouteRequirement> {
    let trimmed = path.trim_end_matches('/');
    let normalized = if trimmed.is_empty() { paths::HOME } else { trimmed };

    ROUTES
        .iter()
        .find(|(route, _)| *route == normalized)
        .and_then(|(_, requirement)| *requirement)
}
