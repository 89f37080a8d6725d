//! The router: owns the route table and runs the navigation pipeline.
//!
//! Every navigation (`push`, `replace`, `back`, `forward`, `go`, `start`)
//! goes through the same steps:
//!
//! 1. take a sequence number (newer navigations supersede older ones);
//! 2. resolve the target, falling back to the not-found route if one is
//!    configured;
//! 3. follow record redirects;
//! 4. run guards in priority order (a redirect restarts the pipeline);
//! 5. run `before_each` hooks;
//! 6. await lazy components of the matched chain;
//! 7. drop the navigation if a newer one started meanwhile;
//! 8. commit the history entry and the current route together;
//! 9. ask the scroll behavior where to scroll;
//! 10. run `after_each` hooks.
//!
//! No lock is held across an `.await`; [`Router`] is `Send + Sync` and all
//! methods take `&self`, so it can be shared behind an `Arc`.
//!
//! ```
//! use route_navigator::{Component, Router, RouterOptions, RouteRecord};
//!
//! let router = Router::new(
//!     RouterOptions::new()
//!         .route(RouteRecord::new("/").name("home").component(Component::page("HomePage")))
//!         .route(RouteRecord::new("/about").name("about").component(Component::page("AboutPage"))),
//! )
//! .unwrap();
//!
//! pollster::block_on(async {
//!     assert!(router.start().await.is_success());
//!     let result = router.push("/about").await;
//!     assert_eq!(result.path(), Some("/about"));
//!     assert_eq!(router.current_route().unwrap().name.as_deref(), Some("about"));
//! });
//! ```

use crate::action::NavigationAction;
#[cfg(feature = "cache")]
use crate::cache::{CacheStats, RouteCache};
use crate::error::{ConfigError, NavigationError, NavigationResult};
use crate::guards::{run_in_priority_order, AuthGuard, RouteGuard};
use crate::history::{History, HistoryMode, MemoryHistory};
use crate::hooks::{after_order, before_order, NavigationHook};
use crate::loader::LazyComponent;
use crate::resolve::{self, ResolvedRoute};
use crate::route::{Component, NavigationTarget, RouteRecord};
use crate::scroll::{scroll_to_top, ScrollBehavior, ScrollPosition, ScrollPositionStore};
use crate::table::RouteTable;
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maximum number of redirects followed by a single navigation.
pub const MAX_REDIRECT_DEPTH: usize = 5;

// ============================================================================
// NavigationRequest
// ============================================================================

/// How the navigation moves through history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// The first navigation, from [`Router::start`].
    Initial,
    Push,
    Replace,
    Back,
    Forward,
}

/// What guards and hooks see of a navigation.
///
/// ```
/// use route_navigator::{NavigationDirection, NavigationRequest, RouteRecord, RouteTable};
/// use std::sync::Arc;
///
/// let table = RouteTable::new(vec![RouteRecord::new("/dashboard")]).unwrap();
/// let to = table.resolve(&"/dashboard".into()).unwrap();
///
/// let request = NavigationRequest::new(Arc::new(to));
/// assert_eq!(request.to.path, "/dashboard");
/// assert!(request.from.is_none());
/// assert_eq!(request.direction, NavigationDirection::Push);
/// ```
#[derive(Debug, Clone)]
pub struct NavigationRequest {
    /// The route being left, `None` on the first navigation.
    pub from: Option<Arc<ResolvedRoute>>,
    /// The resolved target.
    pub to: Arc<ResolvedRoute>,
    pub direction: NavigationDirection,
}

impl NavigationRequest {
    pub fn new(to: Arc<ResolvedRoute>) -> Self {
        Self {
            from: None,
            to,
            direction: NavigationDirection::Push,
        }
    }

    #[must_use]
    pub fn with_from(mut self, from: Option<Arc<ResolvedRoute>>) -> Self {
        self.from = from;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: NavigationDirection) -> Self {
        self.direction = direction;
        self
    }
}

// ============================================================================
// RouterOptions
// ============================================================================

/// Startup configuration for [`Router::new`].
#[must_use]
pub struct RouterOptions {
    routes: Vec<RouteRecord>,
    history: Box<dyn History>,
    guards: Vec<Box<dyn RouteGuard>>,
    hooks: Vec<Box<dyn NavigationHook>>,
    scroll_behavior: ScrollBehavior,
    not_found: Option<String>,
    sensitive: bool,
    #[cfg(feature = "cache")]
    cache_capacity: usize,
}

impl RouterOptions {
    /// No routes, in-memory history, scroll to top on every navigation.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            history: Box::new(MemoryHistory::new(HistoryMode::memory())),
            guards: Vec::new(),
            hooks: Vec::new(),
            scroll_behavior: scroll_to_top(),
            not_found: None,
            sensitive: false,
            #[cfg(feature = "cache")]
            cache_capacity: RouteCache::DEFAULT_CAPACITY,
        }
    }

    /// Append a top-level record.
    pub fn route(mut self, record: RouteRecord) -> Self {
        self.routes.push(record);
        self
    }

    /// Append several top-level records, in order.
    pub fn routes(mut self, records: impl IntoIterator<Item = RouteRecord>) -> Self {
        self.routes.extend(records);
        self
    }

    pub fn history(mut self, history: impl History) -> Self {
        self.history = Box::new(history);
        self
    }

    /// Gate `meta.requiresAuth` routes behind `check`.
    ///
    /// Rejected navigations are cancelled. Use [`auth_guard`](Self::auth_guard)
    /// with [`AuthGuard::redirect_to`] to redirect instead.
    pub fn authorization<F>(self, check: F) -> Self
    where
        F: Fn(&NavigationRequest) -> bool + Send + Sync + 'static,
    {
        self.auth_guard(AuthGuard::new(check))
    }

    pub fn auth_guard(self, guard: AuthGuard) -> Self {
        self.guard(guard)
    }

    /// Add a global guard, checked on every navigation.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn hook<H: NavigationHook>(mut self, hook: H) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Replace the default scroll-to-top policy.
    pub fn scroll_behavior<F>(mut self, behavior: F) -> Self
    where
        F: Fn(&ResolvedRoute, Option<&ResolvedRoute>, Option<ScrollPosition>) -> Option<ScrollPosition>
            + Send
            + Sync
            + 'static,
    {
        self.scroll_behavior = Arc::new(behavior);
        self
    }

    /// Route (by name) shown for paths nothing matches.
    pub fn not_found(mut self, name: impl Into<String>) -> Self {
        self.not_found = Some(name.into());
        self
    }

    /// Match literal segments case-sensitively.
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// Resolution cache size; `0` disables the cache.
    #[cfg(feature = "cache")]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Router
// ============================================================================

struct RouterState {
    history: Box<dyn History>,
    current: Option<Arc<ResolvedRoute>>,
    scroll: ScrollPositionStore,
}

/// Internal kind of history operation performed on commit.
#[derive(Debug, Clone, Copy)]
enum NavigateOp {
    Initial,
    Push,
    Replace,
    /// Traverse by `delta`, landing on absolute history index `entry`.
    Go { delta: isize, entry: usize },
}

impl NavigateOp {
    fn direction(self) -> NavigationDirection {
        match self {
            Self::Initial => NavigationDirection::Initial,
            Self::Push => NavigationDirection::Push,
            Self::Replace => NavigationDirection::Replace,
            Self::Go { delta, .. } if delta < 0 => NavigationDirection::Back,
            Self::Go { .. } => NavigationDirection::Forward,
        }
    }

    /// A redirect out of a traversal lands on a new entry.
    fn redirected(self) -> Self {
        match self {
            Self::Go { .. } => Self::Push,
            other => other,
        }
    }
}

/// Client-side router.
pub struct Router {
    table: RouteTable,
    guards: Vec<Box<dyn RouteGuard>>,
    hooks: Vec<Box<dyn NavigationHook>>,
    scroll_behavior: ScrollBehavior,
    not_found: Option<String>,
    state: Mutex<RouterState>,
    navigation_id: AtomicUsize,
    #[cfg(feature = "cache")]
    cache: Option<Mutex<RouteCache>>,
}

impl Router {
    /// Build the route table and validate the options.
    pub fn new(options: RouterOptions) -> Result<Self, ConfigError> {
        let table = RouteTable::new(options.routes)?.case_sensitive(options.sensitive);

        if let Some(name) = &options.not_found {
            if table.record_by_name(name).is_none() {
                return Err(ConfigError::UnknownNotFoundRoute { name: name.clone() });
            }
        }

        info_log!(
            "Router created: {} routes, {} guards, {} hooks",
            table.len(),
            options.guards.len(),
            options.hooks.len()
        );

        Ok(Self {
            table,
            guards: options.guards,
            hooks: options.hooks,
            scroll_behavior: options.scroll_behavior,
            not_found: options.not_found,
            state: Mutex::new(RouterState {
                history: options.history,
                current: None,
                scroll: ScrollPositionStore::default(),
            }),
            navigation_id: AtomicUsize::new(0),
            #[cfg(feature = "cache")]
            cache: (options.cache_capacity > 0)
                .then(|| Mutex::new(RouteCache::with_capacity(options.cache_capacity))),
        })
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate to the history's current location.
    pub async fn start(&self) -> NavigationResult {
        let location = self.state().history.location().to_string();
        self.navigate(location.into(), NavigateOp::Initial).await
    }

    /// Navigate to `target`, adding a history entry.
    pub async fn push(&self, target: impl Into<NavigationTarget>) -> NavigationResult {
        self.navigate(target.into(), NavigateOp::Push).await
    }

    /// Navigate to `target`, overwriting the current history entry.
    pub async fn replace(&self, target: impl Into<NavigationTarget>) -> NavigationResult {
        self.navigate(target.into(), NavigateOp::Replace).await
    }

    /// Go one entry back. `None` if there is no previous entry.
    pub async fn back(&self) -> Option<NavigationResult> {
        self.go(-1).await
    }

    /// Go one entry forward. `None` if there is no next entry.
    pub async fn forward(&self) -> Option<NavigationResult> {
        self.go(1).await
    }

    /// Move `delta` entries through history, running the full pipeline on
    /// the target entry. `None` if that entry does not exist.
    pub async fn go(&self, delta: isize) -> Option<NavigationResult> {
        let (location, entry) = {
            let state = self.state();
            let entry = state.history.position().checked_add_signed(delta)?;
            (state.history.peek(delta)?.to_string(), entry)
        };
        Some(self.navigate(location.into(), NavigateOp::Go { delta, entry }).await)
    }

    async fn navigate(&self, target: NavigationTarget, op: NavigateOp) -> NavigationResult {
        let nav_id = self.start_navigation();
        let from = self.current_route();
        info_log!(
            "Navigation #{} {:?}: '{}' → '{}'",
            nav_id,
            op,
            from.as_ref().map_or("(none)", |route| route.full_path.as_str()),
            target
        );

        let (request, op) = match self.resolve_and_guard(target, op, from) {
            Ok(resolved) => resolved,
            Err(result) => return result,
        };

        for hook in before_order(&self.hooks) {
            trace_log!("Hook '{}' before_each for '{}'", hook.name(), request.to.full_path);
            hook.before_each(&request);
        }

        let lazy: Vec<LazyComponent> = request
            .to
            .components()
            .filter_map(|component| match component {
                Component::Lazy(lazy) if lazy.resolved().is_none() => Some(lazy.clone()),
                _ => None,
            })
            .collect();
        for component in lazy {
            let loaded = component.load().await;
            if !self.is_navigation_current(nav_id) {
                return self.superseded(nav_id, &request.to);
            }
            if let Err(message) = loaded {
                error_log!(
                    "Loading a component for '{}' failed: {}",
                    request.to.full_path,
                    message
                );
                return NavigationError::LoadFailed {
                    path: request.to.full_path.clone(),
                    message,
                }
                .into();
            }
        }

        let saved = {
            let mut state = self.state();
            if !self.is_navigation_current(nav_id) {
                return self.superseded(nav_id, &request.to);
            }
            match commit(&mut state, op, &request.to) {
                Ok(saved) => saved,
                Err(()) => {
                    warn_log!("History cursor moved before {:?} could commit", op);
                    return self.superseded(nav_id, &request.to);
                }
            }
        };

        let scroll = (self.scroll_behavior)(&request.to, request.from.as_deref(), saved);

        for hook in after_order(&self.hooks) {
            trace_log!("Hook '{}' after_each for '{}'", hook.name(), request.to.full_path);
            hook.after_each(&request);
        }

        info_log!(
            "Navigation #{} complete: '{}' ({} matched)",
            nav_id,
            request.to.full_path,
            request.to.matched.len()
        );
        NavigationResult::Success {
            path: request.to.full_path.clone(),
            scroll,
        }
    }

    /// Steps 2-4: resolve, follow redirects and run guards.
    ///
    /// Returns the request to commit and the (possibly redirected) history
    /// operation, or the final result if the navigation stops here.
    fn resolve_and_guard(
        &self,
        mut target: NavigationTarget,
        mut op: NavigateOp,
        from: Option<Arc<ResolvedRoute>>,
    ) -> Result<(NavigationRequest, NavigateOp), NavigationResult> {
        let mut redirected_from: Option<String> = None;

        for depth in 0..=MAX_REDIRECT_DEPTH {
            let resolved = self.resolve(&target).map_err(|err| {
                warn_log!("Navigation to '{}' failed: {}", target, err);
                NavigationResult::from(err)
            })?;

            if let Some(next) = resolved.leaf().and_then(|leaf| leaf.redirect.clone()) {
                debug_log!(
                    "Route '{}' redirects to '{}' (hop {})",
                    resolved.full_path,
                    next,
                    depth + 1
                );
                redirected_from.get_or_insert_with(|| resolved.full_path.clone());
                target = next;
                op = op.redirected();
                continue;
            }

            let to = if redirected_from.is_some() {
                let mut to = ResolvedRoute::clone(&resolved);
                to.redirected_from.clone_from(&redirected_from);
                Arc::new(to)
            } else {
                resolved
            };

            let request = NavigationRequest::new(to)
                .with_from(from.clone())
                .with_direction(op.direction());

            match self.run_guards(&request) {
                NavigationAction::Continue => return Ok((request, op)),
                NavigationAction::Deny { reason } => {
                    warn_log!("Navigation to '{}' blocked: {}", request.to.full_path, reason);
                    return Err(NavigationResult::Blocked { reason });
                }
                NavigationAction::Redirect { to: next, reason } => {
                    debug_log!(
                        "Guard redirecting from '{}' to '{}': {:?}",
                        request.to.full_path,
                        next,
                        reason
                    );
                    redirected_from.get_or_insert_with(|| request.to.full_path.clone());
                    target = next;
                    op = op.redirected();
                }
            }
        }

        error_log!(
            "Redirect loop detected (depth {}) navigating to '{}'",
            MAX_REDIRECT_DEPTH,
            target
        );
        Err(NavigationError::RedirectLoop {
            path: target.to_string(),
            depth: MAX_REDIRECT_DEPTH,
        }
        .into())
    }

    /// Global guards plus the guards of every matched record.
    fn run_guards(&self, request: &NavigationRequest) -> NavigationAction {
        let global = self.guards.iter().map(|guard| &**guard);
        let per_route = request
            .to
            .matched
            .iter()
            .flat_map(|record| record.guards.iter().map(|guard| &**guard));
        run_in_priority_order(global.chain(per_route), request)
    }

    fn superseded(&self, nav_id: usize, to: &ResolvedRoute) -> NavigationResult {
        debug_log!(
            "Navigation #{} to '{}' superseded by #{}",
            nav_id,
            to.full_path,
            self.navigation_id.load(Ordering::SeqCst)
        );
        NavigationResult::Superseded {
            path: to.full_path.clone(),
        }
    }

    fn start_navigation(&self) -> usize {
        self.navigation_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_navigation_current(&self, nav_id: usize) -> bool {
        self.navigation_id.load(Ordering::SeqCst) == nav_id
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve `target` without navigating.
    ///
    /// Unmatched paths resolve to the not-found route when one is configured.
    pub fn resolve(&self, target: &NavigationTarget) -> Result<Arc<ResolvedRoute>, NavigationError> {
        #[cfg(feature = "cache")]
        if let (Some(cache), NavigationTarget::Path(path)) = (&self.cache, target) {
            if let Some(hit) = lock(cache).get(path) {
                return Ok(hit);
            }
            let resolved = Arc::new(self.resolve_uncached(target)?);
            lock(cache).insert(path.as_str(), Arc::clone(&resolved));
            return Ok(resolved);
        }

        self.resolve_uncached(target).map(Arc::new)
    }

    fn resolve_uncached(&self, target: &NavigationTarget) -> Result<ResolvedRoute, NavigationError> {
        match (self.table.resolve(target), &self.not_found, target) {
            (Err(NavigationError::NoMatch { path }), Some(name), NavigationTarget::Path(raw)) => {
                debug_log!("No route matches '{}', showing '{}'", path, name);
                resolve::resolve_fallback(&self.table, name, raw)
            }
            (result, _, _) => result,
        }
    }

    /// Href for `target` under the history's mode and base.
    pub fn href(&self, target: impl Into<NavigationTarget>) -> Result<String, NavigationError> {
        let resolved = self.resolve(&target.into())?;
        Ok(self.state().history.create_href(&resolved.full_path))
    }

    // ========================================================================
    // State
    // ========================================================================

    /// The committed route, `None` before the first successful navigation.
    pub fn current_route(&self) -> Option<Arc<ResolvedRoute>> {
        self.state().current.clone()
    }

    /// Location of the current history entry.
    pub fn location(&self) -> String {
        self.state().history.location().to_string()
    }

    pub fn history_len(&self) -> usize {
        self.state().history.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.state().history.peek(-1).is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.state().history.peek(1).is_some()
    }

    /// Record the scroll position of the current history entry, handed back
    /// to the scroll behavior when the entry is revisited.
    pub fn save_scroll_position(&self, position: ScrollPosition) {
        let mut state = self.state();
        let entry = state.history.position();
        trace_log!("Saving scroll {:?} for history entry {}", position, entry);
        state.scroll.save(entry, position);
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolution cache statistics, `None` if the cache is disabled.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| *lock(cache).stats())
    }

    fn state(&self) -> MutexGuard<'_, RouterState> {
        lock(&self.state)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("table", &self.table)
            .field("guards", &self.guards.len())
            .field("hooks", &self.hooks.len())
            .field("not_found", &self.not_found)
            .field("navigation_id", &self.navigation_id.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Apply `op` to history and make `to` current. Returns the scroll
/// position saved for the entry being entered.
fn commit(
    state: &mut RouterState,
    op: NavigateOp,
    to: &Arc<ResolvedRoute>,
) -> Result<Option<ScrollPosition>, ()> {
    let saved = match op {
        NavigateOp::Initial | NavigateOp::Replace => {
            state.history.replace(&to.full_path);
            state.scroll.forget(state.history.position());
            None
        }
        NavigateOp::Push => {
            let next = state.history.position() + 1;
            state.scroll.truncate_from(next);
            state.history.push(&to.full_path);
            None
        }
        NavigateOp::Go { delta, entry } => {
            // Another navigation moved the cursor since the entry was peeked.
            if state.history.position().checked_add_signed(delta) != Some(entry)
                || !state.history.go(delta)
            {
                return Err(());
            }
            state.scroll.get(state.history.position())
        }
    };
    state.current = Some(Arc::clone(to));
    Ok(saved)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(vec![
            RouteRecord::new("/").name("home"),
            RouteRecord::new("/about").name("about"),
            RouteRecord::new("/x").name("x"),
        ])
        .unwrap()
    }

    fn route(table: &RouteTable, path: &str) -> Arc<ResolvedRoute> {
        Arc::new(table.resolve(&path.into()).unwrap())
    }

    /// History `[/, /about]` with the cursor on `/about`.
    fn state_on_about(table: &RouteTable) -> RouterState {
        let mut state = RouterState {
            history: Box::new(MemoryHistory::default()),
            current: None,
            scroll: ScrollPositionStore::default(),
        };
        commit(&mut state, NavigateOp::Initial, &route(table, "/")).unwrap();
        commit(&mut state, NavigateOp::Push, &route(table, "/about")).unwrap();
        state
    }

    #[test]
    fn test_traversal_commits_peeked_entry() {
        let table = table();
        let mut state = state_on_about(&table);
        state.scroll.save(0, ScrollPosition::new(120.0, 0.0));

        let op = NavigateOp::Go { delta: -1, entry: 0 };
        let saved = commit(&mut state, op, &route(&table, "/")).unwrap();

        assert_eq!(saved, Some(ScrollPosition::new(120.0, 0.0)));
        assert_eq!(state.history.position(), 0);
        assert_eq!(state.current.as_ref().unwrap().path, "/");
    }

    #[test]
    fn test_traversal_rejected_after_cursor_moved() {
        let table = table();
        let mut state = state_on_about(&table);

        // `back()` peeked entry 0, then a push committed first.
        let op = NavigateOp::Go { delta: -1, entry: 0 };
        commit(&mut state, NavigateOp::Push, &route(&table, "/x")).unwrap();

        assert!(commit(&mut state, op, &route(&table, "/")).is_err());
        assert_eq!(state.history.position(), 2);
        assert_eq!(state.history.location(), "/x");
        assert_eq!(state.current.as_ref().unwrap().path, "/x");
    }

    #[test]
    fn test_replace_forgets_saved_scroll() {
        let table = table();
        let mut state = state_on_about(&table);
        state.scroll.save(1, ScrollPosition::new(300.0, 0.0));

        commit(&mut state, NavigateOp::Replace, &route(&table, "/x")).unwrap();
        assert_eq!(state.scroll.get(1), None);
    }
}
