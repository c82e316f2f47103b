//! Access guard evaluated before rendering a protected view.
//!
//! The guard reads the stored session and hands it to
//! [`codeburger_core::evaluate`]. It never navigates itself; callers act on
//! the returned [`Decision`].
//!
//! # Example
//!
//! ```rust
//! use codeburger_admin::routes::AccessGate;
//! use codeburger_admin::session::MemorySessionStore;
//! use codeburger_core::{Decision, RouteRequirement};
//!
//! let gate = AccessGate::new(MemorySessionStore::new());
//! assert_eq!(gate.check(RouteRequirement::ADMIN), Decision::RedirectTo("/login"));
//! ```

use codeburger_core::{Decision, RouteRequirement, SessionRecord, evaluate};
use tracing::instrument;

use crate::session::{SessionStore, load_session};

use super::requirement_for;

/// Route guard backed by an injected session store.
#[derive(Debug)]
pub struct AccessGate<S> {
    store: S,
}

impl<S: SessionStore> AccessGate<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying session store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The current session, if one is stored and well-formed.
    #[must_use]
    pub fn session(&self) -> Option<SessionRecord> {
        load_session(&self.store)
    }

    /// Decide whether a view guarded by `requirement` may be shown.
    #[instrument(skip(self))]
    pub fn check(&self, requirement: RouteRequirement) -> Decision {
        let session = self.session();
        let decision = evaluate(session.as_ref(), requirement);

        if let Decision::RedirectTo(target) = decision {
            tracing::debug!(
                identity = session.as_ref().map(|s| s.identity.as_str()),
                redirect = target,
                "Access denied, redirecting"
            );
        }

        decision
    }

    /// Decide for a path from the route map. Public and unknown paths are
    /// not guarded and yield `None`.
    #[must_use]
    pub fn check_path(&self, path: &str) -> Option<Decision> {
        requirement_for(path).map(|requirement| self.check(requirement))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use codeburger_core::{SESSION_KEY, paths};

    use super::*;
    use crate::session::{MemorySessionStore, save_session};

    fn gate_with(record: Option<SessionRecord>) -> AccessGate<MemorySessionStore> {
        let store = MemorySessionStore::new();
        if let Some(record) = record {
            save_session(&store, &record).unwrap();
        }
        AccessGate::new(store)
    }

    #[test]
    fn test_no_session_redirects_to_login() {
        let gate = gate_with(None);
        assert_eq!(
            gate.check(RouteRequirement::AUTHENTICATED),
            Decision::RedirectTo(paths::LOGIN)
        );
        assert_eq!(
            gate.check(RouteRequirement::ADMIN),
            Decision::RedirectTo(paths::LOGIN)
        );
    }

    #[test]
    fn test_malformed_session_fails_closed() {
        let store = MemorySessionStore::new();
        store.set(SESSION_KEY, "{\"admin\": tru").unwrap();
        let gate = AccessGate::new(store);

        assert_eq!(
            gate.check(RouteRequirement::ADMIN),
            Decision::RedirectTo(paths::LOGIN)
        );
    }

    #[test]
    fn test_user_is_bounced_from_admin_routes() {
        let gate = gate_with(Some(SessionRecord::new("ana", false)));
        assert_eq!(
            gate.check(RouteRequirement::ADMIN),
            Decision::RedirectTo(paths::HOME)
        );
        assert_eq!(
            gate.check(RouteRequirement::AUTHENTICATED),
            Decision::RenderWithChrome
        );
    }

    #[test]
    fn test_admin_renders_admin_routes_without_chrome() {
        let gate = gate_with(Some(SessionRecord::new("root", true)));
        assert_eq!(gate.check(RouteRequirement::ADMIN), Decision::Render);
        assert_eq!(
            gate.check(RouteRequirement::AUTHENTICATED),
            Decision::RenderWithChrome
        );
    }

    #[test]
    fn test_check_path_uses_route_map() {
        let gate = gate_with(Some(SessionRecord::new("ana", false)));
        assert_eq!(gate.check_path("/login"), None);
        assert_eq!(gate.check_path("/carrinho"), Some(Decision::RenderWithChrome));
        assert_eq!(
            gate.check_path("/novo-produto"),
            Some(Decision::RedirectTo(paths::HOME))
        );
    }
}
