//! Route guards: decide whether a navigation may commit.
//!
//! Guards run after the target is resolved and before any lazy component is
//! loaded or history is touched. A guard sees the full
//! [`NavigationRequest`] (resolved target, current route, direction) and
//! answers with a [`NavigationAction`].
//!
//! Guards come from two places:
//!
//! - the router itself ([`RouterOptions::guard`](crate::RouterOptions::guard)
//!   and the authorization check installed by
//!   [`RouterOptions::authorization`](crate::RouterOptions::authorization));
//! - every record in the matched chain ([`RouteRecord::guard`](crate::RouteRecord::guard)),
//!   so a guard on a parent also protects its children.
//!
//! All collected guards run in **priority order** (higher first); the first
//! non-[`Continue`](NavigationAction::Continue) answer wins. [`AuthGuard`]
//! runs at priority 100.
//!
//! # Example
//!
//! ```
//! use route_navigator::{guard_fn, AuthGuard, NavigationAction, RouteRecord};
//!
//! let admin = RouteRecord::new("/admin")
//!     .meta("requiresAuth", true)
//!     .guard(guard_fn(|request| {
//!         if request.to.query.contains("readonly") {
//!             NavigationAction::deny("Admin is not read-only")
//!         } else {
//!             NavigationAction::Continue
//!         }
//!     }));
//!
//! let auth = AuthGuard::new(|_request| false).redirect_to("/login");
//! # let _ = (admin, auth);
//! ```

use crate::action::NavigationAction;
use crate::route::NavigationTarget;
use crate::NavigationRequest;

// ============================================================================
// RouteGuard trait
// ============================================================================

/// A check run before navigation commits.
pub trait RouteGuard: Send + Sync + 'static {
    /// Decide whether the navigation may proceed.
    fn check(&self, request: &NavigationRequest) -> NavigationAction;

    /// Guard name for logs.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }

    /// Execution priority. Higher runs first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// guard_fn helper
// ============================================================================

/// Create a guard from a closure.
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&NavigationRequest) -> NavigationAction + Send + Sync + 'static,
{
    FnGuard { f }
}

/// Guard created by [`guard_fn`].
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteGuard for FnGuard<F>
where
    F: Fn(&NavigationRequest) -> NavigationAction + Send + Sync + 'static,
{
    fn check(&self, request: &NavigationRequest) -> NavigationAction {
        (self.f)(request)
    }
}

// ============================================================================
// AuthGuard
// ============================================================================

/// Authorization check injected by the host.
pub type AuthCheckFn = Box<dyn Fn(&NavigationRequest) -> bool + Send + Sync>;

/// Gate for records annotated with `meta.requiresAuth = true`.
///
/// Navigations whose matched chain carries no `requiresAuth` flag pass
/// without calling the check. When the check fails the navigation is
/// cancelled silently, or redirected if [`redirect_to`](Self::redirect_to)
/// was set.
pub struct AuthGuard {
    check_fn: AuthCheckFn,
    redirect: Option<NavigationTarget>,
}

impl AuthGuard {
    pub fn new<F>(check_fn: F) -> Self
    where
        F: Fn(&NavigationRequest) -> bool + Send + Sync + 'static,
    {
        Self {
            check_fn: Box::new(check_fn),
            redirect: None,
        }
    }

    /// Redirect rejected navigations instead of cancelling them.
    #[must_use]
    pub fn redirect_to(mut self, target: impl Into<NavigationTarget>) -> Self {
        self.redirect = Some(target.into());
        self
    }
}

impl RouteGuard for AuthGuard {
    fn check(&self, request: &NavigationRequest) -> NavigationAction {
        if !request.to.requires_auth() || (self.check_fn)(request) {
            return NavigationAction::Continue;
        }
        match &self.redirect {
            Some(target) => {
                NavigationAction::redirect_with_reason(target.clone(), "Authentication required")
            }
            None => NavigationAction::deny("Authentication required"),
        }
    }

    fn name(&self) -> &'static str {
        "AuthGuard"
    }

    fn priority(&self) -> i32 {
        100
    }
}

// ============================================================================
// Guard Composition
// ============================================================================

/// Several guards checked together; all must allow.
pub struct Guards {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl Guards {
    #[must_use]
    pub fn new(guards: Vec<Box<dyn RouteGuard>>) -> Self {
        Self { guards }
    }

    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }
}

impl RouteGuard for Guards {
    fn check(&self, request: &NavigationRequest) -> NavigationAction {
        run_in_priority_order(self.guards.iter().map(|guard| &**guard), request)
    }

    fn name(&self) -> &'static str {
        "Guards"
    }

    fn priority(&self) -> i32 {
        self.guards.iter().map(|g| g.priority()).max().unwrap_or(0)
    }
}

/// Builder for [`Guards`].
#[must_use]
#[derive(Default)]
pub struct GuardBuilder {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl GuardBuilder {
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    #[must_use]
    pub fn build(self) -> Guards {
        Guards::new(self.guards)
    }
}

/// Sort by priority (stable, so equal priorities keep declaration order)
/// and return the first non-continue answer.
pub(crate) fn run_in_priority_order<'a>(
    guards: impl IntoIterator<Item = &'a (dyn RouteGuard + 'static)>,
    request: &NavigationRequest,
) -> NavigationAction {
    let mut sorted: Vec<_> = guards.into_iter().collect();
    sorted.sort_by_key(|g| std::cmp::Reverse(g.priority()));

    for guard in sorted {
        let result = guard.check(request);
        crate::trace_log!(
            "Guard '{}' (priority {}) → {:?}",
            guard.name(),
            guard.priority(),
            result
        );
        if !result.is_continue() {
            return result;
        }
    }
    NavigationAction::Continue
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RouteRecord, RouteTable};
    use std::sync::Arc;

    fn request_for(path: &str) -> NavigationRequest {
        let table = RouteTable::new(vec![
            RouteRecord::new("/"),
            RouteRecord::new("/account")
                .meta("requiresAuth", true)
                .children([RouteRecord::new("settings")]),
        ])
        .unwrap();
        let to = table.resolve(&path.into()).unwrap();
        NavigationRequest::new(Arc::new(to))
    }

    #[test]
    fn test_auth_guard_ignores_public_routes() {
        let guard = AuthGuard::new(|_| panic!("check must not run for public routes"));
        assert!(guard.check(&request_for("/")).is_continue());
    }

    #[test]
    fn test_auth_guard_protects_children() {
        let guard = AuthGuard::new(|_| false);
        let result = guard.check(&request_for("/account/settings"));
        assert_eq!(result, NavigationAction::deny("Authentication required"));
    }

    #[test]
    fn test_auth_guard_redirect() {
        let guard = AuthGuard::new(|_| false).redirect_to("/login");
        let result = guard.check(&request_for("/account"));
        assert_eq!(result.redirect_target(), Some(&NavigationTarget::from("/login")));
    }

    #[test]
    fn test_auth_guard_allows_authorized() {
        let guard = AuthGuard::new(|_| true);
        assert!(guard.check(&request_for("/account")).is_continue());
    }

    #[test]
    fn test_guards_priority_order() {
        struct Named(&'static str, i32);
        impl RouteGuard for Named {
            fn check(&self, _request: &NavigationRequest) -> NavigationAction {
                NavigationAction::deny(self.0)
            }
            fn priority(&self) -> i32 {
                self.1
            }
        }

        let guards = Guards::builder()
            .guard(Named("low", 1))
            .guard(Named("high", 50))
            .build();
        assert_eq!(guards.priority(), 50);
        assert_eq!(
            guards.check(&request_for("/")),
            NavigationAction::deny("high")
        );
    }

    #[test]
    fn test_guard_fn() {
        let guard = guard_fn(|request| {
            if request.to.path == "/account" {
                NavigationAction::redirect("/")
            } else {
                NavigationAction::Continue
            }
        });
        assert!(guard.check(&request_for("/account")).is_redirect());
        assert!(guard.check(&request_for("/")).is_continue());
    }
}
