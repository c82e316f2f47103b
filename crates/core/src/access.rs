//! Route access decisions.
//!
//! [`evaluate`] decides, for one navigation, whether a protected view may be
//! shown. It is a pure function of the stored session (if any) and the
//! route's requirement; callers perform the redirect or mount the header.

use serde::{Deserialize, Serialize};

use crate::types::SessionRecord;

/// Fixed navigation targets.
pub mod paths {
    /// Public home, where authenticated non-admins are sent.
    pub const HOME: &str = "/";
    /// Login page, where unauthenticated users are sent.
    pub const LOGIN: &str = "/login";
    /// Admin product listing, shown after a product is created.
    pub const PRODUCT_LIST: &str = "/listar-produtos";
}

/// What a route demands of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RouteRequirement {
    pub requires_admin: bool,
}

impl RouteRequirement {
    /// Any logged-in user.
    pub const AUTHENTICATED: Self = Self {
        requires_admin: false,
    };

    /// Admins only.
    pub const ADMIN: Self = Self {
        requires_admin: true,
    };
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Show the view as-is (admin views carry their own layout).
    Render,
    /// Show the view under the shared navigation header.
    RenderWithChrome,
    /// Send the user elsewhere.
    RedirectTo(&'static str),
}

impl Decision {
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::RedirectTo(_))
    }

    /// Redirect target, if this decision is a redirect.
    #[must_use]
    pub const fn redirect_target(&self) -> Option<&'static str> {
        match *self {
            Self::RedirectTo(path) => Some(path),
            Self::Render | Self::RenderWithChrome => None,
        }
    }
}

/// Decide whether a view guarded by `requirement` may be shown.
///
/// The login check runs before the role check, so an anonymous visitor to an
/// admin route goes to [`paths::LOGIN`], never to [`paths::HOME`].
#[must_use]
pub const fn evaluate(session: Option<&SessionRecord>, requirement: RouteRequirement) -> Decision {
    let Some(session) = session else {
        return Decision::RedirectTo(paths::LOGIN);
    };

    if requirement.requires_admin && !session.is_admin {
        return Decision::RedirectTo(paths::HOME);
    }

    if requirement.requires_admin {
        Decision::Render
    } else {
        Decision::RenderWithChrome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionRecord {
        SessionRecord::new("user@example.com", false)
    }

    fn admin() -> SessionRecord {
        SessionRecord::new("admin@example.com", true)
    }

    #[test]
    fn test_absent_session_redirects_to_login() {
        for requirement in [RouteRequirement::AUTHENTICATED, RouteRequirement::ADMIN] {
            assert_eq!(
                evaluate(None, requirement),
                Decision::RedirectTo(paths::LOGIN)
            );
        }
    }

    #[test]
    fn test_login_check_precedes_role_check() {
        let decision = evaluate(None, RouteRequirement::ADMIN);
        assert_eq!(decision, Decision::RedirectTo("/login"));
        assert_ne!(decision, Decision::RedirectTo("/"));
    }

    #[test]
    fn test_non_admin_on_admin_route_goes_home() {
        assert_eq!(
            evaluate(Some(&user()), RouteRequirement::ADMIN),
            Decision::RedirectTo(paths::HOME)
        );
    }

    #[test]
    fn test_user_route_renders_with_chrome() {
        assert_eq!(
            evaluate(Some(&user()), RouteRequirement::AUTHENTICATED),
            Decision::RenderWithChrome
        );
        assert_eq!(
            evaluate(Some(&admin()), RouteRequirement::AUTHENTICATED),
            Decision::RenderWithChrome
        );
    }

    #[test]
    fn test_admin_route_renders_without_chrome() {
        let decision = evaluate(Some(&admin()), RouteRequirement::ADMIN);
        assert_eq!(decision, Decision::Render);
        assert!(!decision.is_redirect());
        assert_eq!(decision.redirect_target(), None);
    }
}
