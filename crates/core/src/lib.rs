//! Code Burger Core - Shared types and pure rules.
//!
//! This crate provides the types and rules shared by:
//! - `admin` - Runtime side (HTTP client, session storage, submission flow)
//! - `cli` - Command-line front-end driving the admin runtime
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients, no
//! file access, no clocks. Both access decisions and form validation live here
//! so they can be tested without any collaborator.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, session records, category options
//! - [`access`] - Route requirements and the access decision
//! - [`draft`] - Product drafts, image files, and validated products
//! - [`validation`] - Per-field validation of product drafts
//! - [`notification`] - User-facing notifications for the submission flow

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod draft;
pub mod notification;
pub mod types;
pub mod validation;

pub use access::{Decision, RouteRequirement, evaluate, paths};
pub use draft::{ACCEPTED_IMAGE_TYPES, ImageFile, ImageFileError, NewProduct, ProductDraft};
pub use notification::{Notification, NotificationKind};
pub use types::*;
pub use validation::{Field, FieldError, MAX_IMAGE_BYTES, ValidationResult, validate};
