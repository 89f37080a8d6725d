//! Route resolution.
//!
//! Resolution turns a [`NavigationTarget`] into a [`ResolvedRoute`]: the
//! chain of matched records from the outermost parent down to the leaf,
//! the extracted params and the merged meta. It is computed **once** per
//! navigation and shared read-only afterwards.
//!
//! # Path targets
//!
//! Given routes:
//! ```text
//! /              (home)
//! /posts         (has children)
//!   ""           (index → post list)
//!   :postId      (post detail)
//! /:pathMatch(.*)*
//! ```
//!
//! `/posts/42` resolves to:
//! ```text
//! [0] "/posts"    params={}
//! [1] ":postId"   params={postId: "42"}
//! ```
//!
//! and `/posts` to `["/posts", ""]` through the index child.
//!
//! Records are tried depth-first in declaration order. For each record its
//! own pattern is tried first, then its aliases, then the next sibling. A
//! parent that matches a prefix but whose children cannot consume the rest
//! of the path is backtracked.
//!
//! # Named targets
//!
//! The named record's ancestor-joined pattern is filled with the supplied
//! params. A name that is no route name but matches an alias as written
//! on a record selects that record, filled through the alias pattern.
//! Missing params fail with [`NavigationError::MissingParam`]; extra
//! params are ignored. Values are percent-encoded into the path.

use crate::error::NavigationError;
use crate::params::{decode_path_segment, QueryParams, RouteParams};
use crate::pattern::{split_path, Segment};
use crate::route::{Component, NavigationTarget, RouteMeta, RouteRecord};
use crate::table::{RouteNode, RouteTable};
use crate::{debug_log, trace_log, warn_log};
use std::borrow::Cow;
use std::sync::Arc;

// ============================================================================
// ResolvedRoute
// ============================================================================

/// The outcome of resolving a navigation target.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    /// Matched records, root ancestor first, leaf last.
    pub matched: Vec<Arc<RouteRecord>>,
    /// Path params accumulated across the chain.
    pub params: RouteParams,
    /// Normalized path without query or hash.
    pub path: String,
    /// `path` plus `?query` and `#hash` when present.
    pub full_path: String,
    pub query: QueryParams,
    /// Fragment without the leading `#`.
    pub hash: Option<String>,
    /// Name of the leaf record.
    pub name: Option<String>,
    /// Meta merged from root to leaf; the child wins on collision.
    pub meta: RouteMeta,
    /// Full path of the navigation that redirected here, if any.
    pub redirected_from: Option<String>,
}

impl ResolvedRoute {
    fn new(
        matched: Vec<Arc<RouteRecord>>,
        params: RouteParams,
        path: String,
        query: QueryParams,
        hash: Option<String>,
    ) -> Self {
        let meta = matched
            .iter()
            .fold(RouteMeta::new(), |meta, record| meta.merged_with(&record.meta));
        let name = matched.last().and_then(|record| record.name.clone());
        let full_path = full_path(&path, &query, hash.as_deref());

        Self {
            matched,
            params,
            path,
            full_path,
            query,
            hash,
            name,
            meta,
            redirected_from: None,
        }
    }

    /// The deepest matched record.
    pub fn leaf(&self) -> Option<&Arc<RouteRecord>> {
        self.matched.last()
    }

    /// `true` if any record in the chain sets `meta.requiresAuth = true`.
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|record| record.meta.requires_auth())
    }

    /// Components of the matched chain, outermost first.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.matched.iter().filter_map(|record| record.component.as_ref())
    }

    /// `true` if some component in the chain still has to be loaded.
    pub fn needs_load(&self) -> bool {
        self.components().any(Component::needs_load)
    }

    /// Whether the record named `name` is part of the chain.
    pub fn is_within(&self, name: &str) -> bool {
        self.matched
            .iter()
            .any(|record| record.name.as_deref() == Some(name))
    }
}

// ============================================================================
// Resolution
// ============================================================================

pub(crate) fn resolve(
    table: &RouteTable,
    target: &NavigationTarget,
) -> Result<ResolvedRoute, NavigationError> {
    match target {
        NavigationTarget::Path(raw) => resolve_path(table, raw),
        NavigationTarget::Named {
            name,
            params,
            query,
        } => resolve_named(table, name, params, query.clone()),
    }
}

fn resolve_path(table: &RouteTable, raw: &str) -> Result<ResolvedRoute, NavigationError> {
    let (path, query, hash) = split_location(raw);
    let path = normalize_path(path);
    let segments = split_path(&path);

    let mut chain = Vec::new();
    let params = match_level(
        &table.roots,
        &segments,
        table.sensitive,
        &RouteParams::new(),
        &mut chain,
    )
    .ok_or_else(|| NavigationError::NoMatch {
        path: path.to_string(),
    })?;

    debug_log!(
        "Resolved '{}' → [{}]",
        path,
        chain
            .iter()
            .map(|node| format!("\"{}\"", node.record.path))
            .collect::<Vec<_>>()
            .join(" → ")
    );

    let matched = chain.iter().map(|node| Arc::clone(&node.record)).collect();
    Ok(ResolvedRoute::new(
        matched,
        params,
        path.into_owned(),
        QueryParams::from_query_string(query),
        hash.map(str::to_string),
    ))
}

fn resolve_named(
    table: &RouteTable,
    name: &str,
    params: &RouteParams,
    query: QueryParams,
) -> Result<ResolvedRoute, NavigationError> {
    let (chain, pattern) = table
        .lookup_target(name)
        .ok_or_else(|| NavigationError::UnknownRoute {
            name: name.to_string(),
        })?;
    let path = pattern.build(params, name)?;

    let declared: Vec<&str> = pattern.param_names().collect();
    for (key, _) in params.iter() {
        if !declared.contains(&key) {
            warn_log!("Ignoring param '{}' not used by route '{}'", key, name);
        }
    }

    let kept: RouteParams = pattern
        .segments()
        .iter()
        .filter_map(|segment| {
            let key = segment.param_name()?;
            let value = params.get(key).unwrap_or("");
            match segment {
                Segment::CatchAll(_) => Some((key, value.trim_matches('/'))),
                _ => Some((key, value)),
            }
        })
        .collect();

    debug_log!("Resolved named route '{}' → '{}'", name, path);

    let matched = chain.iter().map(|node| Arc::clone(&node.record)).collect();
    Ok(ResolvedRoute::new(matched, kept, path, query, None))
}

/// Resolve the record named `name` in place of a path nothing matched.
///
/// The resolved path stays the one that was requested. If the record's
/// pattern ends in a catch-all, the requested path is bound to it.
pub(crate) fn resolve_fallback(
    table: &RouteTable,
    name: &str,
    missed: &str,
) -> Result<ResolvedRoute, NavigationError> {
    let chain = table
        .chain_by_name(name)
        .ok_or_else(|| NavigationError::UnknownRoute {
            name: name.to_string(),
        })?;

    let (path, query, hash) = split_location(missed);
    let path = normalize_path(path);

    let mut params = RouteParams::new();
    if let Some(Segment::CatchAll(param)) = chain
        .last()
        .and_then(|leaf| leaf.full_pattern.segments().last())
    {
        params.insert(
            param.as_str(),
            decode_path_segment(path.trim_start_matches('/')),
        );
    }

    let matched = chain.iter().map(|node| Arc::clone(&node.record)).collect();
    Ok(ResolvedRoute::new(
        matched,
        params,
        path.into_owned(),
        QueryParams::from_query_string(query),
        hash.map(str::to_string),
    ))
}

/// Recursive matching with backtracking.
///
/// Pushes matched nodes onto `chain` and returns the accumulated params on
/// a complete match. On failure `chain` is left as it was.
fn match_level<'t>(
    nodes: &'t [RouteNode],
    remaining: &[&str],
    sensitive: bool,
    inherited: &RouteParams,
    chain: &mut Vec<&'t RouteNode>,
) -> Option<RouteParams> {
    for node in nodes {
        for pattern in &node.patterns {
            // Empty pattern: index record when nothing is left, layout
            // record wrapping its children otherwise.
            if pattern.is_empty() {
                if remaining.is_empty() {
                    chain.push(node);
                    try_index(&node.children, chain);
                    return Some(inherited.clone());
                }
                if !node.children.is_empty() {
                    chain.push(node);
                    if let Some(params) =
                        match_level(&node.children, remaining, sensitive, inherited, chain)
                    {
                        return Some(params);
                    }
                    chain.pop();
                }
                continue;
            }

            let Some(prefix) = pattern.match_prefix(remaining, sensitive) else {
                continue;
            };
            trace_log!(
                "Pattern '{}' consumed {} of {} segments",
                pattern,
                prefix.consumed,
                remaining.len()
            );

            let params = RouteParams::merge(inherited, &prefix.params);
            let after = &remaining[prefix.consumed..];
            chain.push(node);

            if after.is_empty() {
                try_index(&node.children, chain);
                return Some(params);
            }

            if let Some(params) = match_level(&node.children, after, sensitive, &params, chain) {
                return Some(params);
            }
            chain.pop();
        }
    }
    None
}

/// With the path fully consumed, descend into the first empty-path child
/// (and its own index, recursively).
fn try_index<'t>(children: &'t [RouteNode], chain: &mut Vec<&'t RouteNode>) {
    if let Some(index) = children.iter().find(|child| child.patterns[0].is_empty()) {
        chain.push(index);
        try_index(&index.children, chain);
    }
}

// ============================================================================
// Path helpers
// ============================================================================

/// Normalize a path: leading slash, no trailing slash, no empty segments.
///
/// ```
/// use route_navigator::resolve::normalize_path;
///
/// assert_eq!(normalize_path("/users/123"), "/users/123");
/// assert_eq!(normalize_path("users//123/"), "/users/123");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path == "/" {
        return Cow::Borrowed(path);
    }

    let already = path.starts_with('/') && !path.ends_with('/') && !path.contains("//");
    if already {
        return Cow::Borrowed(path);
    }

    Cow::Owned(format!("/{}", split_path(path).join("/")))
}

/// Split `path?query#hash` into its three parts.
fn split_location(raw: &str) -> (&str, &str, Option<&str>) {
    let (rest, hash) = match raw.split_once('#') {
        Some((rest, hash)) => (rest, Some(hash).filter(|h| !h.is_empty())),
        None => (raw, None),
    };
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    (path, query, hash)
}

fn full_path(path: &str, query: &QueryParams, hash: Option<&str>) -> String {
    let mut full = path.to_string();
    if !query.is_empty() {
        full.push('?');
        full.push_str(&query.to_query_string());
    }
    if let Some(hash) = hash {
        full.push('#');
        full.push_str(hash);
    }
    full
}
