//! Navigation hooks for side effects around a navigation.
//!
//! Guards decide *whether* a navigation happens; hooks only observe it.
//! `before_each` runs once guards have allowed the navigation, before lazy
//! components load. `after_each` runs once the new route is committed: this
//! is where a host mounts the matched components or records analytics.
//!
//! Hooks execute in **priority order** (higher first) for `before_each`,
//! and in reverse for `after_each`.
//!
//! ```
//! use route_navigator::{hook_fn, NavigationHook, NavigationRequest};
//!
//! struct PageTitle;
//!
//! impl NavigationHook for PageTitle {
//!     fn after_each(&self, request: &NavigationRequest) {
//!         let _title = request.to.meta.get("title");
//!     }
//! }
//!
//! let logger = hook_fn(|request| println!("leaving for {}", request.to.full_path), |_| {});
//! # let _ = logger;
//! ```

use crate::NavigationRequest;

/// Observer of the navigation pipeline.
pub trait NavigationHook: Send + Sync + 'static {
    /// Called after guards pass, before components load.
    fn before_each(&self, _request: &NavigationRequest) {}

    /// Called after the navigation committed.
    fn after_each(&self, request: &NavigationRequest);

    /// Hook name for logs.
    fn name(&self) -> &'static str {
        "NavigationHook"
    }

    /// Priority (higher runs first for `before_each`, last for `after_each`).
    fn priority(&self) -> i32 {
        0
    }
}

/// Create a hook from two closures.
pub const fn hook_fn<B, A>(before: B, after: A) -> FnHook<B, A>
where
    B: Fn(&NavigationRequest) + Send + Sync + 'static,
    A: Fn(&NavigationRequest) + Send + Sync + 'static,
{
    FnHook { before, after }
}

/// Hook created by [`hook_fn`].
pub struct FnHook<B, A> {
    before: B,
    after: A,
}

impl<B, A> NavigationHook for FnHook<B, A>
where
    B: Fn(&NavigationRequest) + Send + Sync + 'static,
    A: Fn(&NavigationRequest) + Send + Sync + 'static,
{
    fn before_each(&self, request: &NavigationRequest) {
        (self.before)(request);
    }

    fn after_each(&self, request: &NavigationRequest) {
        (self.after)(request);
    }
}

/// Hooks sorted for `before_each` (priority descending).
pub(crate) fn before_order(
    hooks: &[Box<dyn NavigationHook>],
) -> Vec<&(dyn NavigationHook + 'static)> {
    let mut sorted: Vec<_> = hooks.iter().map(|hook| &**hook).collect();
    sorted.sort_by_key(|h| std::cmp::Reverse(h.priority()));
    sorted
}

/// Hooks sorted for `after_each` (reverse of `before_each`).
pub(crate) fn after_order(
    hooks: &[Box<dyn NavigationHook>],
) -> Vec<&(dyn NavigationHook + 'static)> {
    let mut sorted = before_order(hooks);
    sorted.reverse();
    sorted
}
