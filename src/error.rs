//! Error handling for route tables and navigation.
//!
//! - [`ConfigError`]: the route table could not be built (malformed
//!   pattern, duplicate name, misplaced catch-all). Reported once, at
//!   startup.
//! - [`NavigationError`]: a navigation target could not be resolved or
//!   its components could not be loaded.
//! - [`NavigationResult`]: the outcome of every call into the navigation
//!   pipeline (`Success`, `NotFound`, `Blocked`, `Superseded`, `Error`).
//!
//! # Examples
//!
//! ```
//! use route_navigator::NavigationResult;
//!
//! let blocked = NavigationResult::Blocked {
//!     reason: "Authentication required".into(),
//! };
//! assert!(blocked.is_blocked());
//! assert_eq!(blocked.path(), None);
//! ```

use crate::scroll::ScrollPosition;
use std::fmt;

// ============================================================================
// Configuration errors
// ============================================================================

/// The route table is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A path or alias pattern could not be parsed.
    InvalidPattern { pattern: String, reason: String },

    /// Two records share the same name.
    DuplicateName { name: String },

    /// A catch-all record is followed by siblings that it would shadow.
    CatchAllNotLast { pattern: String },

    /// Nesting is deeper than the router supports.
    TooDeep { pattern: String, max_depth: usize },

    /// The designated not-found route name is not registered.
    UnknownNotFoundRoute { name: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid route pattern '{}': {}", pattern, reason)
            }
            ConfigError::DuplicateName { name } => {
                write!(f, "Duplicate route name: {}", name)
            }
            ConfigError::CatchAllNotLast { pattern } => {
                write!(
                    f,
                    "Catch-all route '{}' must be declared after its siblings",
                    pattern
                )
            }
            ConfigError::TooDeep { pattern, max_depth } => {
                write!(
                    f,
                    "Route '{}' exceeds the maximum nesting depth of {}",
                    pattern, max_depth
                )
            }
            ConfigError::UnknownNotFoundRoute { name } => {
                write!(f, "Not-found route '{}' is not registered", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Navigation errors
// ============================================================================

/// A navigation target could not be turned into a committed route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No record matches the path and no catch-all is declared.
    NoMatch { path: String },

    /// No record carries the requested name.
    UnknownRoute { name: String },

    /// Named navigation is missing a value for a required segment.
    MissingParam { route: String, param: String },

    /// A supplied parameter cannot be placed into the pattern.
    InvalidParams { message: String },

    /// A lazy component loader rejected.
    LoadFailed { path: String, message: String },

    /// Redirects chained past the allowed depth.
    RedirectLoop { path: String, depth: usize },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::NoMatch { path } => {
                write!(f, "No route matches: {}", path)
            }
            NavigationError::UnknownRoute { name } => {
                write!(f, "No route named: {}", name)
            }
            NavigationError::MissingParam { route, param } => {
                write!(f, "Missing required param '{}' for route '{}'", param, route)
            }
            NavigationError::InvalidParams { message } => {
                write!(f, "Invalid parameters: {}", message)
            }
            NavigationError::LoadFailed { path, message } => {
                write!(f, "Failed to load components for '{}': {}", path, message)
            }
            NavigationError::RedirectLoop { path, depth } => {
                write!(f, "Redirect loop detected (depth {}): target '{}'", depth, path)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

impl NavigationError {
    /// `true` for the errors that mean "nothing matched".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NavigationError::NoMatch { .. } | NavigationError::UnknownRoute { .. }
        )
    }
}

// ============================================================================
// Navigation Result
// ============================================================================

/// Outcome of a navigation attempt through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// The route was committed. `scroll` is what the scroll policy asked for.
    Success {
        path: String,
        scroll: Option<ScrollPosition>,
    },
    /// Nothing matched and no not-found route is configured.
    NotFound { path: String },
    /// A guard cancelled the navigation.
    Blocked { reason: String },
    /// A newer navigation started before this one could commit.
    Superseded { path: String },
    /// Resolution or loading failed.
    Error(NavigationError),
}

impl NavigationResult {
    /// Check if navigation was successful
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if route was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if navigation was blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// Check if a newer navigation won
    pub fn is_superseded(&self) -> bool {
        matches!(self, NavigationResult::Superseded { .. })
    }

    /// Check if there was an error
    pub fn is_error(&self) -> bool {
        matches!(self, NavigationResult::Error(_))
    }

    /// The committed path, for successful navigations.
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationResult::Success { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Scroll target chosen for a successful navigation.
    pub fn scroll(&self) -> Option<ScrollPosition> {
        match self {
            NavigationResult::Success { scroll, .. } => *scroll,
            _ => None,
        }
    }

    /// Why a guard cancelled the navigation.
    pub fn blocked_reason(&self) -> Option<&str> {
        match self {
            NavigationResult::Blocked { reason } => Some(reason),
            _ => None,
        }
    }

    /// The error, if any.
    pub fn error(&self) -> Option<&NavigationError> {
        match self {
            NavigationResult::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NavigationError> for NavigationResult {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::NoMatch { path } => NavigationResult::NotFound { path },
            other => NavigationResult::Error(other),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
