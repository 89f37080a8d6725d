//! Route pattern parsing and segment matching.
//!
//! A pattern is split on `/` into segments:
//!
//! | Syntax | Segment | Matches |
//! |--------|---------|---------|
//! | `posts` | [`Segment::Static`] | the literal text |
//! | `:postId` | [`Segment::Param`] | exactly one path segment |
//! | `*`, `*rest`, `:pathMatch(.*)*` | [`Segment::CatchAll`] | every remaining segment, possibly none |
//!
//! Empty segments are ignored, so `"/posts/"`, `"posts"` and `"//posts"`
//! are the same pattern. A pattern with no segments (`""` or `"/"`) is an
//! index or layout pattern. A catch-all must be the last segment; a bare
//! `*` binds its value to `pathMatch`.
//!
//! Matching is prefix-based: [`RoutePattern::match_prefix`] reports how
//! many path segments the pattern consumed, leaving the rest for child
//! records.
//!
//! ```
//! use route_navigator::pattern::RoutePattern;
//!
//! let pattern = RoutePattern::parse("/posts/:postId").unwrap();
//! let m = pattern.match_prefix(&["posts", "42", "comments"], false).unwrap();
//! assert_eq!(m.params.get("postId"), Some("42"));
//! assert_eq!(m.consumed, 2);
//! ```

use crate::error::{ConfigError, NavigationError};
use crate::params::{decode_path_segment, encode_path_segment, RouteParams};
use std::borrow::Cow;
use std::fmt;

/// Param name bound by a bare `*`.
pub const DEFAULT_CATCH_ALL_PARAM: &str = "pathMatch";

/// One parsed segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text.
    Static(String),
    /// `:name`
    Param(String),
    /// Greedy tail capture.
    CatchAll(String),
}

impl Segment {
    /// Parameter name, for dynamic segments.
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param(name) | Segment::CatchAll(name) => Some(name),
        }
    }
}

/// Parameters and consumed segment count from a prefix match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch {
    pub params: RouteParams,
    pub consumed: usize,
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern, rejecting syntax the matcher does not support.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let raw_segments: Vec<&str> = split_path(pattern);
        let mut segments = Vec::with_capacity(raw_segments.len());

        for (index, raw) in raw_segments.iter().enumerate() {
            let segment = parse_segment(raw).map_err(|reason| invalid(&reason))?;

            if matches!(segment, Segment::CatchAll(_)) && index + 1 != raw_segments.len() {
                return Err(invalid("catch-all must be the last segment"));
            }
            if let Some(name) = segment.param_name() {
                if segments
                    .iter()
                    .any(|s: &Segment| s.param_name() == Some(name))
                {
                    return Err(invalid(&format!("param '{name}' appears twice")));
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `true` for index/layout patterns with no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `true` if the pattern ends with a catch-all segment.
    pub fn is_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::CatchAll(_)))
    }

    /// Names of every dynamic segment, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::param_name)
    }

    /// Append `child`'s segments to this pattern.
    pub fn join(&self, child: &RoutePattern) -> RoutePattern {
        let raw = if child.is_empty() {
            self.raw.clone()
        } else {
            format!(
                "{}/{}",
                self.raw.trim_end_matches('/'),
                child.raw.trim_start_matches('/')
            )
        };
        let mut segments = self.segments.clone();
        segments.extend(child.segments.iter().cloned());
        RoutePattern { raw, segments }
    }

    /// Match the pattern against the front of `path`.
    ///
    /// Segments are percent-decoded before comparison and capture. Literal
    /// segments compare ASCII-case-insensitively unless `sensitive`.
    pub fn match_prefix(&self, path: &[&str], sensitive: bool) -> Option<PrefixMatch> {
        let mut params = RouteParams::new();
        let mut consumed = 0;

        for segment in &self.segments {
            match segment {
                Segment::Static(text) => {
                    let candidate = decode_path_segment(path.get(consumed)?);
                    let equal = if sensitive {
                        candidate == text.as_str()
                    } else {
                        candidate.eq_ignore_ascii_case(text)
                    };
                    if !equal {
                        return None;
                    }
                    consumed += 1;
                }
                Segment::Param(name) => {
                    let value = path.get(consumed)?;
                    params.insert(name.as_str(), decode_path_segment(value));
                    consumed += 1;
                }
                Segment::CatchAll(name) => {
                    let tail = path[consumed..].join("/");
                    params.insert(name.as_str(), decode_path_segment(&tail));
                    consumed = path.len();
                }
            }
        }

        Some(PrefixMatch { params, consumed })
    }

    /// Substitute `params` into the pattern to produce a concrete path.
    ///
    /// `route` names the record in error messages. A catch-all may be
    /// absent or empty; every `:param` must be present and non-empty.
    /// Values are percent-encoded, so matching the built path yields
    /// `params` back.
    pub fn build(&self, params: &RouteParams, route: &str) -> Result<String, NavigationError> {
        let mut parts: Vec<Cow<'_, str>> = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Static(text) => parts.push(encode_path_segment(text)),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| NavigationError::MissingParam {
                            route: route.to_string(),
                            param: name.clone(),
                        })?;
                    if value.contains('/') {
                        return Err(NavigationError::InvalidParams {
                            message: format!(
                                "param '{name}' of route '{route}' cannot contain '/': '{value}'"
                            ),
                        });
                    }
                    parts.push(encode_path_segment(value));
                }
                Segment::CatchAll(name) => {
                    let value = params.get(name).unwrap_or("").trim_matches('/');
                    if !value.is_empty() {
                        let encoded: Vec<_> = value.split('/').map(encode_path_segment).collect();
                        parts.push(Cow::Owned(encoded.join("/")));
                    }
                }
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a path into its non-empty segments.
///
/// ```
/// use route_navigator::pattern::split_path;
///
/// assert_eq!(split_path("/users/123/"), vec!["users", "123"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn parse_segment(raw: &str) -> Result<Segment, String> {
    if let Some(rest) = raw.strip_prefix(':') {
        if let Some((name, regex)) = rest.split_once('(') {
            return match regex {
                ".*)" | ".*)*" => Ok(Segment::CatchAll(valid_name(name)?.to_string())),
                _ => Err(format!(
                    "custom param pattern '({regex}' is not supported, only '(.*)'"
                )),
            };
        }
        if rest.ends_with(['?', '+', '*']) {
            return Err(format!(
                "optional or repeatable param '{raw}' is not supported"
            ));
        }
        return Ok(Segment::Param(valid_name(rest)?.to_string()));
    }

    if let Some(rest) = raw.strip_prefix('*') {
        let name = if rest.is_empty() {
            DEFAULT_CATCH_ALL_PARAM
        } else {
            valid_name(rest)?
        };
        return Ok(Segment::CatchAll(name.to_string()));
    }

    if raw.contains([':', '*', '(', ')']) {
        return Err(format!("unexpected special character in segment '{raw}'"));
    }
    Ok(Segment::Static(raw.to_string()))
}

fn valid_name(name: &str) -> Result<&str, String> {
    if name.is_empty() {
        return Err("param name is empty".to_string());
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("param name '{name}' has invalid characters"));
    }
    Ok(name)
}
