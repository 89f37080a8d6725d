//! Route records: the declarative building blocks of a route table.
//!
//! A [`RouteRecord`] maps a path pattern to a [`Component`] and may carry a
//! name, aliases, nested children, a redirect, per-route guards and
//! [`RouteMeta`] annotations. Records are plain values; they are validated
//! and compiled when handed to [`RouteTable::new`](crate::RouteTable::new).
//!
//! # Example
//!
//! ```
//! use route_navigator::{Component, RouteRecord};
//!
//! let posts = RouteRecord::new("/posts")
//!     .name("posts")
//!     .component(Component::page("PostsPage"))
//!     .children([RouteRecord::new(":postId")
//!         .name("post")
//!         .component(Component::page("PostPage"))
//!         .meta("requiresAuth", true)]);
//!
//! assert_eq!(posts.get_children().len(), 1);
//! assert!(posts.get_children()[0].meta_map().requires_auth());
//! ```

use crate::guards::RouteGuard;
use crate::loader::LazyComponent;
use crate::params::{QueryParams, RouteParams};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Meta key consulted by the authorization gate.
pub const REQUIRES_AUTH: &str = "requiresAuth";

// ============================================================================
// Components
// ============================================================================

/// Identifier of a renderable unit understood by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(Arc<str>);

impl ComponentId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// What a record renders: a known component or one loaded on demand.
#[derive(Debug, Clone)]
pub enum Component {
    Page(ComponentId),
    Lazy(LazyComponent),
}

impl Component {
    /// An eagerly available component.
    pub fn page(id: impl AsRef<str>) -> Self {
        Self::Page(ComponentId::new(id))
    }

    /// A component produced by an async loader on first navigation.
    pub fn lazy<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ComponentId, String>> + Send + 'static,
    {
        Self::Lazy(LazyComponent::new(loader))
    }

    /// The component id if it is available without loading.
    pub fn ready(&self) -> Option<ComponentId> {
        match self {
            Self::Page(id) => Some(id.clone()),
            Self::Lazy(lazy) => lazy.resolved(),
        }
    }

    /// `true` for lazy components that have not resolved yet.
    pub fn needs_load(&self) -> bool {
        matches!(self, Self::Lazy(lazy) if lazy.resolved().is_none())
    }
}

// ============================================================================
// Meta
// ============================================================================

/// A single meta value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl MetaValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for MetaValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Key/value annotations attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    values: BTreeMap<String, MetaValue>,
}

impl RouteMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.values.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `meta.requiresAuth == true`
    pub fn requires_auth(&self) -> bool {
        self.get_bool(REQUIRES_AUTH).unwrap_or(false)
    }

    /// Layer `child` over `self`: keys the child sets win, the rest are kept.
    pub fn merged_with(&self, child: &RouteMeta) -> RouteMeta {
        let mut merged = self.clone();
        for (key, value) in &child.values {
            merged.values.insert(key.clone(), value.clone());
        }
        merged
    }
}

// ============================================================================
// RouteRecord
// ============================================================================

/// A single entry of the route table.
pub struct RouteRecord {
    pub(crate) path: String,
    pub(crate) name: Option<String>,
    pub(crate) component: Option<Component>,
    pub(crate) children: Vec<Arc<RouteRecord>>,
    pub(crate) aliases: Vec<String>,
    pub(crate) redirect: Option<NavigationTarget>,
    pub(crate) meta: RouteMeta,
    pub(crate) guards: Vec<Box<dyn RouteGuard>>,
}

impl RouteRecord {
    /// A record for `path` with nothing attached yet.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            component: None,
            children: Vec::new(),
            aliases: Vec::new(),
            redirect: None,
            meta: RouteMeta::new(),
            guards: Vec::new(),
        }
    }

    /// Unique name for named navigation.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Component rendered for this record.
    pub fn component(mut self, component: Component) -> Self {
        self.component = Some(component);
        self
    }

    /// Additional pattern that resolves to this record.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Nested records, matched relative to this record's path.
    pub fn children(mut self, children: impl IntoIterator<Item = RouteRecord>) -> Self {
        self.children.extend(children.into_iter().map(Arc::new));
        self
    }

    /// Send navigations that land on this record elsewhere.
    pub fn redirect(mut self, target: impl Into<NavigationTarget>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    /// Set a meta value.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key, value);
        self
    }

    /// Guard checked whenever this record (or a descendant) is matched.
    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    // Accessors

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn get_component(&self) -> Option<&Component> {
        self.component.as_ref()
    }

    pub fn get_children(&self) -> &[Arc<RouteRecord>] {
        &self.children
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn redirect_target(&self) -> Option<&NavigationTarget> {
        self.redirect.as_ref()
    }

    pub fn meta_map(&self) -> &RouteMeta {
        &self.meta
    }

    pub fn guards(&self) -> &[Box<dyn RouteGuard>] {
        &self.guards
    }
}

impl fmt::Debug for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("component", &self.component)
            .field("aliases", &self.aliases)
            .field("meta", &self.meta)
            .field("children", &self.children.len())
            .field("guards", &self.guards.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// NavigationTarget
// ============================================================================

/// Where to navigate: a literal path or a named route with params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// A path, optionally with `?query` and `#hash`.
    Path(String),
    /// A named route.
    Named {
        name: String,
        params: RouteParams,
        query: QueryParams,
    },
}

impl NavigationTarget {
    /// Target a literal path.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Target a named route without params.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            params: RouteParams::new(),
            query: QueryParams::new(),
        }
    }

    /// Add a path param to a named target. No effect on path targets.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Named { params, .. } = &mut self {
            params.insert(key, value);
        }
        self
    }

    /// Replace all path params of a named target. No effect on path targets.
    #[must_use]
    pub fn with_params(mut self, new_params: RouteParams) -> Self {
        if let Self::Named { params, .. } = &mut self {
            *params = new_params;
        }
        self
    }

    /// Add a query value to a named target. No effect on path targets.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Named { query, .. } = &mut self {
            query.insert(key, value);
        }
        self
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Named { name, params, .. } => {
                write!(f, "{{name: {}", name)?;
                for (key, value) in params.iter() {
                    write!(f, ", {}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&String> for NavigationTarget {
    fn from(path: &String) -> Self {
        Self::Path(path.clone())
    }
}
