//! Form workflows and the UI seams they report through.
//!
//! Flows never draw anything or change the location themselves. They raise
//! [`Notification`]s through a [`Notifier`] and request page changes through
//! a [`Navigator`]; the hosting view decides how to show them.

pub mod new_product;

pub use new_product::{
    FlowError, FlowState, NAVIGATION_DELAY, ProductSubmissionFlow, SubmissionOutcome,
};

use std::sync::Arc;

use codeburger_core::Notification;

/// Receives toast-style notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Performs client-side navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &'static str);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification);
    }
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn navigate(&self, path: &'static str) {
        (**self).navigate(path);
    }
}
