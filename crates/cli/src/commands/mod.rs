//! Command implementations.

pub mod gate;
pub mod products;
pub mod session;

use codeburger_admin::routes::AccessGate;
use codeburger_admin::services::HttpProductService;
use codeburger_admin::session::FileSessionStore;
use codeburger_admin::{AdminConfig, AppError};
use codeburger_core::Decision;
use secrecy::SecretString;

/// The access gate over the configured session file.
pub fn gate(config: &AdminConfig) -> AccessGate<FileSessionStore> {
    AccessGate::new(FileSessionStore::new(&config.session_file))
}

/// Fail with [`AppError::Redirected`] unless the current session may open `path`.
pub fn require(gate: &AccessGate<FileSessionStore>, path: &str) -> Result<(), AppError> {
    match gate.check_path(path) {
        Some(Decision::RedirectTo(target)) => Err(AppError::Redirected(target)),
        _ => Ok(()),
    }
}

/// Product API client authorized with the stored session token, if any.
pub fn product_service(
    config: &AdminConfig,
    gate: &AccessGate<FileSessionStore>,
) -> Result<HttpProductService, AppError> {
    let token = gate
        .session()
        .and_then(|session| session.token)
        .map(SecretString::from);
    Ok(HttpProductService::new(config, token)?)
}
