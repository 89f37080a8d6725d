//! The verdict returned by guards.
//!
//! Every guard answers a navigation with a [`NavigationAction`]: let it
//! through, cancel it, or send it somewhere else. The router stops at the
//! first answer that is not [`Continue`](NavigationAction::Continue).
//!
//! ```
//! use route_navigator::{NavigationAction, NavigationTarget};
//!
//! let action = NavigationAction::redirect("/login");
//! assert_eq!(action.redirect_target(), Some(&NavigationTarget::from("/login")));
//!
//! assert!(NavigationAction::deny("Not authorized").is_deny());
//! ```

use crate::route::NavigationTarget;

/// Result of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Allow navigation to proceed.
    Continue,

    /// Cancel navigation.
    Deny {
        /// Human-readable reason for denying navigation.
        reason: String,
    },

    /// Navigate to a different target instead.
    Redirect {
        to: NavigationTarget,
        reason: Option<String>,
    },
}

impl NavigationAction {
    /// Alias for [`Continue`](Self::Continue).
    pub fn allow() -> Self {
        Self::Continue
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    pub fn redirect(to: impl Into<NavigationTarget>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: None,
        }
    }

    pub fn redirect_with_reason(to: impl Into<NavigationTarget>, reason: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: Some(reason.into()),
        }
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// The redirect target, if this is a redirect.
    pub fn redirect_target(&self) -> Option<&NavigationTarget> {
        match self {
            Self::Redirect { to, .. } => Some(to),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_action_continue() {
        let action = NavigationAction::allow();
        assert!(action.is_continue());
        assert!(!action.is_deny());
        assert!(!action.is_redirect());
        assert_eq!(action.redirect_target(), None);
    }

    #[test]
    fn test_navigation_action_deny() {
        match NavigationAction::deny("Not authorized") {
            NavigationAction::Deny { reason } => assert_eq!(reason, "Not authorized"),
            other => panic!("Expected Deny, got {other:?}"),
        }
    }

    #[test]
    fn test_navigation_action_redirect_named() {
        let action = NavigationAction::redirect_with_reason(
            NavigationTarget::named("login"),
            "Auth required",
        );
        assert!(action.is_redirect());
        match action {
            NavigationAction::Redirect { to, reason } => {
                assert_eq!(to, NavigationTarget::named("login"));
                assert_eq!(reason.as_deref(), Some("Auth required"));
            }
            other => panic!("Expected Redirect, got {other:?}"),
        }
    }
}
