//! Path parameters and query strings.
//!
//! - [`RouteParams`]: values captured by `:name` and catch-all segments.
//!   Values are always strings; use [`RouteParams::get_as`] to parse on
//!   demand.
//! - [`QueryParams`]: the `?key=value&...` part of a navigation target,
//!   multi-valued and kept in key order so a serialized query string is
//!   stable.
//!
//! # Example
//!
//! ```
//! use route_navigator::{QueryParams, RouteParams};
//!
//! let params = RouteParams::from_pairs([("postId", "42")]);
//! assert_eq!(params.get("postId"), Some("42"));
//! assert_eq!(params.get_as::<u32>("postId"), Some(42));
//!
//! let query = QueryParams::from_query_string("tab=comments&page=2");
//! assert_eq!(query.get("tab"), Some("comments"));
//! assert_eq!(query.to_query_string(), "page=2&tab=comments");
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Parameters captured from dynamic path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: BTreeMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a parameter and parse it as `T`.
    ///
    /// Returns `None` if the parameter is missing or does not parse.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Merge parent parameters with child parameters.
    ///
    /// Child values win on collision.
    ///
    /// ```
    /// use route_navigator::RouteParams;
    ///
    /// let parent = RouteParams::from_pairs([("userId", "7"), ("view", "list")]);
    /// let child = RouteParams::from_pairs([("view", "grid")]);
    ///
    /// let merged = RouteParams::merge(&parent, &child);
    /// assert_eq!(merged.get("userId"), Some("7"));
    /// assert_eq!(merged.get("view"), Some("grid"));
    /// ```
    pub fn merge(parent: &RouteParams, child: &RouteParams) -> RouteParams {
        let mut merged = parent.clone();
        for (key, value) in child.iter() {
            merged.insert(key, value);
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters parsed from a navigation target.
///
/// Keys may repeat (`?tag=a&tag=b`); [`get`](Self::get) returns the first
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string (without the leading `?`).
    ///
    /// A key with no `=` is kept with an empty value.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = Self::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(decode_uri_component(key), decode_uri_component(value));
        }
        params
    }

    /// Get the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.first().map(String::as_str)
    }

    /// Get all values for a key.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.params.get(key).map(Vec::as_slice)
    }

    /// Get the first value for a key, parsed as `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Append a value for the given key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.entry(key.into()).or_default().push(value.into());
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Serialize back into a query string, keys in order.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .flat_map(|(key, values)| {
                values.iter().map(move |value| {
                    format!(
                        "{}={}",
                        encode_uri_component(key),
                        encode_uri_component(value)
                    )
                })
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of distinct keys.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

// ============================================================================
// Percent encoding
// ============================================================================

/// Percent-encode everything outside the unreserved set.
fn encode_uri_component(s: &str) -> Cow<'_, str> {
    urlencoding::encode(s)
}

/// Decode a query key or value: `+` is a space, malformed escapes stay
/// literal.
fn decode_uri_component(s: &str) -> String {
    decode_lossy(&s.replace('+', " ")).into_owned()
}

/// Encode one path segment so `?`, `#`, `%` and friends survive a
/// round trip through a location string.
pub(crate) fn encode_path_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}

/// Decode `%XX` escapes in a path segment. `+` is kept as is.
pub(crate) fn decode_path_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('%') {
        decode_lossy(segment)
    } else {
        Cow::Borrowed(segment)
    }
}

fn decode_lossy(s: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(s.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(s),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

// ============================================================================
// Tests
// ============================================================================
