//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! cb-cli session login -i admin@codeburger.com --admin -t <token>
//! cb-cli session show
//! cb-cli session logout
//! ```

use codeburger_admin::session::{FileSessionStore, clear_session, load_session, save_session};
use codeburger_admin::{AdminConfig, AppError};
use codeburger_core::SessionRecord;
use tracing::info;

/// Store a session record, replacing any previous one.
pub fn login(
    config: &AdminConfig,
    identity: String,
    admin: bool,
    token: Option<String>,
) -> Result<(), AppError> {
    let store = FileSessionStore::new(&config.session_file);
    let mut record = SessionRecord::new(identity, admin);
    if let Some(token) = token {
        record = record.with_token(token);
    }

    save_session(&store, &record)?;
    info!(identity = %record.identity, admin, path = %store.path().display(), "Session stored");
    Ok(())
}

/// Remove the stored session.
pub fn logout(config: &AdminConfig) -> Result<(), AppError> {
    let store = FileSessionStore::new(&config.session_file);
    clear_session(&store)?;
    info!("Session cleared");
    Ok(())
}

/// Print the stored session, token redacted.
#[allow(clippy::print_stdout)]
pub fn show(config: &AdminConfig) {
    let store = FileSessionStore::new(&config.session_file);
    match load_session(&store) {
        Some(record) => println!(
            "{} ({}){}",
            record.identity,
            if record.is_admin { "admin" } else { "user" },
            if record.token.is_some() { " [token]" } else { "" }
        ),
        None => println!("Not signed in"),
    }
}
