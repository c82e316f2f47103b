//! Code Burger Admin library.
//!
//! Runtime side of the admin client: everything that talks to the outside
//! world on behalf of the pure rules in `codeburger-core`.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`session`] - Persisted session store and login/logout helpers
//! - [`routes`] - Route map and the access gate
//! - [`services`] - Product API client
//! - [`forms`] - New-product submission flow
//! - [`components`] - View models for product browsing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod forms;
pub mod routes;
pub mod services;
pub mod session;

pub use config::AdminConfig;
pub use error::AppError;
