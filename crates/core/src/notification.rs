//! User-facing notifications raised by the submission flow.

use serde::Serialize;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Pending,
    Success,
    Warning,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: &'static str,
}

impl Notification {
    pub const CREATING_PRODUCT: Self = Self {
        kind: NotificationKind::Pending,
        message: "Criando novo produto...",
    };

    pub const PRODUCT_CREATED: Self = Self {
        kind: NotificationKind::Success,
        message: "Produto criado com sucesso",
    };

    /// Shown for every submission failure, whatever the cause.
    pub const PRODUCT_FAILED: Self = Self {
        kind: NotificationKind::Error,
        message: "Falha ao criar novo produto",
    };

    pub const CATEGORIES_FAILED: Self = Self {
        kind: NotificationKind::Warning,
        message: "Falha ao carregar categorias",
    };
}
