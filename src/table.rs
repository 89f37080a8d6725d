//! The immutable route table.
//!
//! [`RouteTable::new`] takes the declarative [`RouteRecord`] list once at
//! startup, validates it and compiles every pattern. After that the table
//! never changes; resolving against it is a pure function.
//!
//! Validation rejects:
//!
//! - malformed path or alias patterns;
//! - duplicate route names anywhere in the tree;
//! - a bare catch-all record (`*`, `/:pathMatch(.*)*`) that is followed by
//!   siblings it would shadow;
//! - a catch-all record with children;
//! - nesting deeper than [`MAX_DEPTH`].
//!
//! ```
//! use route_navigator::{RouteRecord, RouteTable};
//!
//! let table = RouteTable::new(vec![
//!     RouteRecord::new("/").name("home"),
//!     RouteRecord::new("/about").name("about"),
//!     RouteRecord::new("/:pathMatch(.*)*").name("not-found"),
//! ])
//! .unwrap();
//!
//! assert_eq!(table.len(), 3);
//! assert!(table.record_by_name("about").is_some());
//! ```

use crate::error::{ConfigError, NavigationError};
use crate::pattern::RoutePattern;
use crate::resolve::{self, ResolvedRoute};
use crate::route::{NavigationTarget, RouteRecord};
use crate::{debug_log, info_log};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maximum nesting depth of the route tree.
pub const MAX_DEPTH: usize = 16;

/// A record with its compiled patterns.
pub(crate) struct RouteNode {
    pub(crate) record: Arc<RouteRecord>,
    /// Own pattern first, then aliases, all relative to the parent.
    pub(crate) patterns: Vec<RoutePattern>,
    /// Own pattern joined onto every ancestor's own pattern.
    pub(crate) full_pattern: RoutePattern,
    /// Each alias joined onto the parent's full pattern.
    pub(crate) full_aliases: Vec<RoutePattern>,
    pub(crate) children: Vec<RouteNode>,
}

impl RouteNode {
    fn is_bare_catch_all(&self) -> bool {
        let own = &self.patterns[0];
        own.is_catch_all() && own.segments().len() == 1
    }
}

/// Compiled, validated, immutable set of routes.
pub struct RouteTable {
    pub(crate) roots: Vec<RouteNode>,
    /// Name → child indices from the roots down to the named record.
    named: HashMap<String, Vec<usize>>,
    /// Alias as written → record indices and alias position.
    aliases: HashMap<String, (Vec<usize>, usize)>,
    pub(crate) sensitive: bool,
    len: usize,
}

impl RouteTable {
    /// Validate and compile `records`.
    pub fn new(records: impl IntoIterator<Item = RouteRecord>) -> Result<Self, ConfigError> {
        let records: Vec<Arc<RouteRecord>> = records.into_iter().map(Arc::new).collect();
        let mut registry = Registry::default();
        let root_pattern = RoutePattern::parse("/")?;

        let roots = compile_level(&records, &root_pattern, &mut Vec::new(), &mut registry)?;
        let Registry {
            named,
            aliases,
            len,
        } = registry;

        info_log!(
            "Route table built: {} records ({} named)",
            len,
            named.len()
        );

        Ok(Self {
            roots,
            named,
            aliases,
            sensitive: false,
            len,
        })
    }

    /// Match literal segments case-sensitively. Off by default.
    #[must_use]
    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// Resolve a target against this table.
    pub fn resolve(&self, target: &NavigationTarget) -> Result<ResolvedRoute, NavigationError> {
        resolve::resolve(self, target)
    }

    /// Total number of records, children included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Top-level records in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<RouteRecord>> {
        self.roots.iter().map(|node| &node.record)
    }

    /// Registered route names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.named.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a record by name.
    pub fn record_by_name(&self, name: &str) -> Option<&Arc<RouteRecord>> {
        self.chain_by_name(name)
            .and_then(|chain| chain.last().copied())
            .map(|node| &node.record)
    }

    /// The node chain (root to named record) for `name`.
    pub(crate) fn chain_by_name(&self, name: &str) -> Option<Vec<&RouteNode>> {
        self.chain_at(self.named.get(name)?)
    }

    /// Chain and full pattern for a named target. Route names are looked
    /// up first, then alias patterns as written on their records.
    pub(crate) fn lookup_target(&self, name: &str) -> Option<(Vec<&RouteNode>, &RoutePattern)> {
        if let Some(chain) = self.chain_by_name(name) {
            let leaf = *chain.last()?;
            return Some((chain, &leaf.full_pattern));
        }

        let (indices, alias) = self.aliases.get(name)?;
        let chain = self.chain_at(indices)?;
        let leaf = *chain.last()?;
        debug_log!("Named target '{}' matched an alias of '{}'", name, leaf.record.path);
        Some((chain, leaf.full_aliases.get(*alias)?))
    }

    fn chain_at(&self, indices: &[usize]) -> Option<Vec<&RouteNode>> {
        let mut level = &self.roots;
        let mut chain = Vec::with_capacity(indices.len());
        for &index in indices {
            let node = level.get(index)?;
            chain.push(node);
            level = &node.children;
        }
        Some(chain)
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("len", &self.len)
            .field("names", &self.names())
            .field("sensitive", &self.sensitive)
            .finish_non_exhaustive()
    }
}

/// Lookup maps filled while compiling.
#[derive(Default)]
struct Registry {
    named: HashMap<String, Vec<usize>>,
    aliases: HashMap<String, (Vec<usize>, usize)>,
    len: usize,
}

fn compile_level(
    records: &[Arc<RouteRecord>],
    parent_full: &RoutePattern,
    indices: &mut Vec<usize>,
    registry: &mut Registry,
) -> Result<Vec<RouteNode>, ConfigError> {
    if !records.is_empty() && indices.len() >= MAX_DEPTH {
        return Err(ConfigError::TooDeep {
            pattern: parent_full.to_string(),
            max_depth: MAX_DEPTH,
        });
    }

    let mut nodes: Vec<RouteNode> = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if let Some(previous) = nodes.last() {
            if previous.is_bare_catch_all() {
                return Err(ConfigError::CatchAllNotLast {
                    pattern: previous.record.path.clone(),
                });
            }
        }

        let own = RoutePattern::parse(&record.path)?;
        let mut patterns = vec![own];
        for alias in &record.aliases {
            patterns.push(RoutePattern::parse(alias)?);
        }

        if patterns[0].is_catch_all() && !record.children.is_empty() {
            return Err(ConfigError::InvalidPattern {
                pattern: record.path.clone(),
                reason: "a catch-all route cannot have children".to_string(),
            });
        }

        let full_pattern = parent_full.join(&patterns[0]);
        let full_aliases: Vec<RoutePattern> = patterns[1..]
            .iter()
            .map(|alias| parent_full.join(alias))
            .collect();
        indices.push(index);

        if let Some(name) = &record.name {
            if registry.named.insert(name.clone(), indices.clone()).is_some() {
                return Err(ConfigError::DuplicateName { name: name.clone() });
            }
            debug_log!("Registered named route '{}' → '{}'", name, full_pattern);
        }
        for (position, alias) in record.aliases.iter().enumerate() {
            // First declared record keeps a shared alias.
            registry
                .aliases
                .entry(alias.clone())
                .or_insert_with(|| (indices.clone(), position));
        }

        let children = compile_level(&record.children, &full_pattern, indices, registry)?;
        indices.pop();
        registry.len += 1;

        nodes.push(RouteNode {
            record: Arc::clone(record),
            patterns,
            full_pattern,
            full_aliases,
            children,
        });
    }

    Ok(nodes)
}
